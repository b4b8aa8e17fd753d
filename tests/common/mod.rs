//! Shared test utilities and fixture generators

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Raw accepted-loans CSV content in the upstream format: percent signs,
/// "N months" terms, "Mon-Year" issue dates, and a mix of outcomes.
///
/// 12 rows: 5 good (Fully Paid), 4 bad (3 Charged Off + 1 Late), and
/// 3 unmappable (2 Current + 1 In Grace Period).
pub fn raw_csv_content() -> String {
    let header = "id,loan_amnt,term,int_rate,installment,grade,sub_grade,emp_length,\
                  home_ownership,annual_inc,verification_status,issue_d,loan_status,\
                  purpose,addr_state,dti,delinq_2yrs,inq_last_6mths,open_acc,pub_rec,\
                  revol_bal,revol_util,total_acc,application_type";

    let rows = [
        "1,10000, 36 months,13.56%,340.1,B,B2,10+ years,RENT,60000,Verified,Dec-2015,Fully Paid,debt_consolidation,CA,18.2,0,1,8,0,12000,45.3%,20,Individual",
        "2,25000, 60 months,18.94%,648.5,D,D1,3 years,MORTGAGE,85000,Source Verified,Dec-2015,Charged Off,credit_card,TX,24.1,1,2,12,0,30000,78.1%,30,Individual",
        "3,5000, 36 months,7.90%,156.4,A,A4,< 1 year,OWN,40000,Not Verified,Jan-2016,Fully Paid,car,NY,8.5,0,0,5,0,3000,22.0%,10,Individual",
        "4,15000, 36 months,11.99%,498.1,B,B5,5 years,RENT,55000,Verified,Jan-2016,Fully Paid,home_improvement,FL,15.0,0,1,7,0,8000,51.2%,18,Individual",
        "5,30000, 60 months,22.35%,834.9,E,E3,n/a,RENT,45000,Verified,Feb-2016,Charged Off,small_business,OH,30.5,2,3,15,1,42000,92.7%,35,Individual",
        "6,8000, 36 months,9.44%,256.0,A,A5,2 years,MORTGAGE,70000,Not Verified,Feb-2016,Fully Paid,vacation,WA,10.1,0,0,6,0,5000,30.0%,14,Individual",
        "7,20000, 60 months,15.61%,482.6,C,C3,8 years,MORTGAGE,95000,Source Verified,Mar-2016,Late (31-120 days),debt_consolidation,IL,19.8,0,1,10,0,18000,60.5%,25,Individual",
        "8,12000, 36 months,10.75%,391.3,B,B3,6 years,OWN,62000,Verified,Mar-2016,Fully Paid,credit_card,GA,14.3,0,0,9,0,9500,48.8%,22,Individual",
        "9,18000, 60 months,20.00%,476.9,D,D4,1 year,RENT,50000,Verified,Apr-2016,Charged Off,medical,AZ,27.9,1,2,11,0,22000,85.0%,28,Individual",
        "10,7000, 36 months,8.18%,219.9,A,A3,4 years,MORTGAGE,78000,Not Verified,Apr-2016,Current,moving,CO,9.2,0,0,7,0,4000,25.5%,16,Individual",
        "11,22000, 60 months,17.27%,550.2,C,C5,7 years,RENT,68000,Source Verified,May-2016,Current,debt_consolidation,NC,21.6,0,1,13,0,26000,70.3%,27,Individual",
        "12,9000, 36 months,12.62%,301.5,B,B4,9 years,OWN,58000,Verified,May-2016,In Grace Period,other,MI,16.7,0,1,8,0,7500,40.0%,19,Individual",
    ];

    format!("{}\n{}\n", header, rows.join("\n"))
}

/// Write the raw CSV fixture into a temp directory using the upstream
/// naming scheme, so directory scanning finds it.
pub fn create_raw_csv_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("accepted_2007_to_2018Q4.csv");
    std::fs::write(&csv_path, raw_csv_content()).unwrap();
    (temp_dir, csv_path)
}

/// Write the raw CSV fixture gzip-compressed, as the upstream archive
/// ships it.
pub fn create_raw_csv_gz_dir() -> (TempDir, PathBuf) {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let temp_dir = TempDir::new().unwrap();
    let gz_path = temp_dir.path().join("accepted_2007_to_2018Q4.csv.gz");

    let file = std::fs::File::create(&gz_path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(raw_csv_content().as_bytes()).unwrap();
    encoder.finish().unwrap();

    (temp_dir, gz_path)
}

/// Create a processed-style DataFrame large enough to train on.
///
/// Half the rows are low-amount grade-A loans that repaid, half are
/// high-amount grade-F loans that defaulted.
pub fn create_processed_dataframe(rows: usize) -> DataFrame {
    let amounts: Vec<f64> = (0..rows)
        .map(|i| if i % 2 == 0 { 2000.0 } else { 28000.0 })
        .collect();
    let rates: Vec<f64> = (0..rows)
        .map(|i| if i % 2 == 0 { 7.5 } else { 21.0 })
        .collect();
    let grades: Vec<&str> = (0..rows).map(|i| if i % 2 == 0 { "A" } else { "F" }).collect();
    let months: Vec<&str> = (0..rows)
        .map(|i| if i % 3 == 0 { "2015-12" } else { "2016-01" })
        .collect();
    let targets: Vec<i32> = (0..rows).map(|i| (i % 2) as i32).collect();

    df! {
        "loan_amnt" => amounts,
        "int_rate" => rates,
        "grade" => grades,
        "issue_month" => months,
        "target" => targets,
    }
    .unwrap()
}

/// Write a DataFrame to a temporary Parquet file.
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("train.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
