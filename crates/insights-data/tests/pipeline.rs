use std::io::Write;
use std::path::{Path, PathBuf};

use insights_core::metrics::{aggregate_kpis, filter_by};
use insights_core::models::FilterSelection;
use insights_core::settings::SourcePaths;
use insights_data::analysis::{analyze, analyze_sources};
use insights_data::reader::load_datasets;
use tempfile::TempDir;

fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

fn fixture(dir: &Path) -> SourcePaths {
    let ads = write_csv(
        dir,
        "datos_publicidad.csv",
        "fecha,canal,campana,impresiones,clicks,conversiones,gasto_ars,ingresos_ars\n\
         2024-03-01,Search,Verano,10000,400,25,100000,320000\n\
         2024-03-01,Social,Invierno,8000,150,4,50000,40000\n\
         2024-03-02,Social,Verano,9000,300,12,0,0\n\
         2024-03-02,Display,Otoño,5000,60,3,25000,80000\n",
    );
    let traffic = write_csv(
        dir,
        "datos_trafico_web.csv",
        "fecha,canal,usuarios,sesiones\n\
         2024-03-01,Search,1200,1500\n\
         2024-03-01,Social,900,1000\n\
         2024-03-02,Search,1100,1300\n\
         2024-03-02,Directo,300,320\n",
    );
    SourcePaths { ads, traffic }
}

#[test]
fn end_to_end_snapshot_over_all_rows() {
    let dir = TempDir::new().unwrap();
    let snapshot = analyze_sources(&fixture(dir.path())).unwrap();

    assert_eq!(snapshot.kpis.total_spend, 175_000.0);
    assert_eq!(snapshot.kpis.total_revenue, 440_000.0);
    assert_eq!(snapshot.kpis.total_conversions, 44);
    assert!((snapshot.kpis.global_roas - 440_000.0 / 175_000.0).abs() < 1e-12);

    let order: Vec<(&str, f64)> = snapshot
        .ranked
        .iter()
        .map(|r| (r.campaign.as_str(), r.roas))
        .collect();
    assert_eq!(
        order,
        vec![("Verano", 3.2), ("Otoño", 3.2), ("Invierno", 0.8), ("Verano", 0.0)]
    );

    assert_eq!(snapshot.traffic.get("Search"), Some(2300));
    assert_eq!(snapshot.traffic.get("Directo"), Some(300));
    assert_eq!(snapshot.traffic.grand_total(), 3500);
}

#[test]
fn identity_filter_matches_unfiltered_kpis() {
    let dir = TempDir::new().unwrap();
    let (ads, _) = load_datasets(&fixture(dir.path())).unwrap();
    let all = FilterSelection::all_of(&ads);
    assert_eq!(aggregate_kpis(&filter_by(&ads, &all)), aggregate_kpis(&ads));
}

#[test]
fn filtered_snapshot_uses_and_semantics() {
    let dir = TempDir::new().unwrap();
    let (ads, traffic) = load_datasets(&fixture(dir.path())).unwrap();
    let selection = FilterSelection::new(["Social"], ["Verano"]);
    let snapshot = analyze(&ads, &traffic, &selection);

    assert_eq!(snapshot.detail.len(), 1);
    assert_eq!(snapshot.detail[0].campaign, "Verano");
    assert_eq!(snapshot.kpis.global_roas, 0.0);
    assert_eq!(snapshot.traffic.grand_total(), 3500);
}

#[test]
fn missing_traffic_file_aborts_run() {
    let dir = TempDir::new().unwrap();
    let mut paths = fixture(dir.path());
    paths.traffic = dir.path().join("nope.csv");
    let err = analyze_sources(&paths).unwrap_err();
    assert!(err.is_load_error());
}
