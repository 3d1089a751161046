use std::io::Write;
use tailrisk::prelude::*;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_ffme_layout() {
    let file = csv_file(
        ",<= 0,Lo 30,Med 40,Hi 30,Lo 10,Dec 2,Hi 10\n\
         192607,-99.99,-0.43,1.52,2.68,-1.45,0.29,3.33\n\
         192608,-99.99,3.90,3.04,2.09,5.12,0.96,2.33\n\
         192609,-99.99,-1.08,-0.54,0.16,-99.99,-1.91,-0.09\n",
    );

    let table = load_ffme_returns(file.path()).unwrap();
    let names: Vec<&str> = table.names().collect();
    assert_eq!(names, ["SmallCap", "LargeCap"]);
    assert_eq!(table.periods()[0], Period::new(1926, 7).unwrap());

    let small = table.get("SmallCap").unwrap();
    assert!((small.values()[0].unwrap() + 0.0145).abs() < 1e-12);
    assert_eq!(small.values()[2], None);

    //the sentinel surfaces as a missing value error, not a silent skip
    let err = var_gaussian(small, 5.0, false).unwrap_err();
    assert_eq!(
        err,
        RiskError::MissingValue {
            period: Period::new(1926, 9).unwrap()
        }
    );

    let large = table.get("LargeCap").unwrap();
    assert!((large.values()[1].unwrap() - 0.0233).abs() < 1e-12);
}

#[test]
fn loads_hfi_layout_and_sorts_rows() {
    let file = csv_file(
        "date,Convertible Arbitrage,CTA Global\n\
         28/02/1997,1.23,3.12\n\
         31/01/1997,1.19,3.93\n\
         31/03/1997,0.78,-0.21\n",
    );

    let table = load_hfi_returns(file.path()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.periods(),
        [
            Period::new(1997, 1).unwrap(),
            Period::new(1997, 2).unwrap(),
            Period::new(1997, 3).unwrap()
        ]
    );

    let cta = table.get("CTA Global").unwrap();
    assert!((cta.values()[0].unwrap() - 0.0393).abs() < 1e-12);

    let var = var_historic(&table, 50.0).unwrap();
    let var = var.as_per_asset().unwrap();
    assert!((var["Convertible Arbitrage"] + 0.0119).abs() < 1e-12);
}

#[test]
fn generic_layout_keeps_fractions() {
    let file = csv_file("period,fund\n2020-01-31,0.01\n2020-02-29,\n");

    let table = load_returns_csv(file.path(), &LoaderOptions::default()).unwrap();
    let fund = table.get("fund").unwrap();
    assert_eq!(fund.values(), [Some(0.01), None]);
}

#[test]
fn duplicate_periods_are_rejected() {
    let file = csv_file("date,a\n31/01/1997,1.0\n15/01/1997,2.0\n");
    assert!(load_hfi_returns(file.path()).is_err());
}

#[test]
fn bad_cells_name_the_line() {
    let file = csv_file("date,a\n31/01/1997,oops\n");
    let err = load_hfi_returns(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}

#[test]
fn missing_selected_column_is_an_error() {
    let file = csv_file(",Lo 10\n192607,1.0\n");
    let err = load_ffme_returns(file.path()).unwrap_err();
    assert!(err.to_string().contains("Hi 10"));
}
