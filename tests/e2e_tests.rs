//! End-to-end integration tests
//!
//! These tests validate the complete replay pipeline using predefined CSV
//! fixtures. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Replays every command through the engine
//! 3. Generates the requested report
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path scenarios
//! - Error conditions (insufficient funds, unknown and duplicate accounts)
//! - Malformed rows that must be skipped without aborting the run
//! - Decimal precision
//! - The history report

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_ledger_engine::cli::ReportKind;
    use rust_ledger_engine::replay::{replay, ReplaySummary};
    use rust_ledger_engine::ReplayError;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Run a test fixture by replaying input.csv and comparing with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Input or expected files cannot be read
    /// - Output doesn't match expected
    fn run_test_fixture(fixture_name: &str, report: ReportKind) -> ReplaySummary {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        let summary = replay(Path::new(&input_path), &mut temp_output, report)
            .unwrap_or_else(|e| panic!("Failed to replay commands: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));

        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (report: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, report, actual_output, expected_output
        );

        summary
    }

    #[rstest]
    #[case::happy_path("happy_path", ReportKind::Balances, 5, 0)]
    #[case::insufficient_funds("insufficient_funds", ReportKind::Balances, 3, 4)]
    #[case::malformed_data("malformed_data", ReportKind::Balances, 3, 7)]
    #[case::duplicate_and_unknown(
        "duplicate_and_unknown_accounts",
        ReportKind::Balances,
        3,
        4
    )]
    #[case::precision("precision", ReportKind::Balances, 5, 0)]
    #[case::history_report("history_report", ReportKind::History, 4, 3)]
    fn test_fixtures(
        #[case] fixture: &str,
        #[case] report: ReportKind,
        #[case] applied: usize,
        #[case] rejected: usize,
    ) {
        let summary = run_test_fixture(fixture, report);
        assert_eq!(summary, ReplaySummary { applied, rejected });
    }

    #[test]
    fn test_missing_input_file() {
        let mut output = Vec::new();
        let result = replay(
            Path::new("tests/fixtures/does_not_exist/input.csv"),
            &mut output,
            ReportKind::Balances,
        );

        assert!(matches!(result, Err(ReplayError::FileNotFound { .. })));
    }
}
