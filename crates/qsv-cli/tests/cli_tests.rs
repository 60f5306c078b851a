//! CLI command parsing and utility tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`),
//! circuit loading from JSON files, and error paths.

// The CLI is a binary crate, so the loading logic is exercised through the
// same library calls `commands::common` makes, and clap parsing is validated
// against an equivalent command definition.

// ============================================================================
// Circuit loading
// ============================================================================

mod circuit_loading {
    use std::fs;
    use std::path::Path;

    use anyhow::Context;
    use qsv_ir::{Circuit, ClbitId, InitialState, QubitId};
    use qsv_sim::Simulator;

    /// Equivalent to commands::common::load_circuit
    fn load_circuit(path: &Path) -> anyhow::Result<Circuit> {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let source = fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.is_empty() && !ext.eq_ignore_ascii_case("json") {
            anyhow::bail!("Unsupported circuit format '.{ext}': expected a JSON file");
        }
        let circuit: Circuit = serde_json::from_str(&source).context("Failed to parse circuit")?;
        circuit.validate().context("Invalid circuit")?;
        Ok(circuit)
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = load_circuit(Path::new("/nonexistent/circuit.json")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_load_teleportation_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teleport.json");

        let input = InitialState::from_real([0.3, 0.6], [QubitId(0)]).unwrap();
        let circuit = Circuit::teleportation(input).unwrap();
        fs::write(&path, serde_json::to_string_pretty(&circuit).unwrap()).unwrap();

        let loaded = load_circuit(&path).unwrap();
        assert_eq!(loaded.instructions(), circuit.instructions());
        let original = circuit.initial_state().unwrap().amplitudes();
        let reloaded = loaded.initial_state().unwrap().amplitudes();
        for (a, b) in original.iter().zip(reloaded) {
            assert!((a - b).norm() < 1e-12);
        }

        let counts = Simulator::with_seed(1).run(&loaded, 500).unwrap();
        assert_eq!(counts.total_shots(), 500);
        assert!(counts.marginal(ClbitId(2)).get("1") > counts.marginal(ClbitId(2)).get("0"));
    }

    #[test]
    fn test_load_hand_written_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.json");
        fs::write(
            &path,
            r#"{
                "name": "bell",
                "num_qubits": 2,
                "num_clbits": 2,
                "instructions": [
                    {"op": "gate", "gate": {"kind": {"Standard": "H"}}, "qubits": [0]},
                    {"op": "gate", "gate": {"kind": {"Standard": "CX"}}, "qubits": [0, 1]},
                    {"op": "measure", "qubit": 0, "clbit": 0},
                    {"op": "measure", "qubit": 1, "clbit": 1}
                ]
            }"#,
        )
        .unwrap();

        let circuit = load_circuit(&path).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_measurements(), 2);
    }

    #[test]
    fn test_load_rejects_out_of_range_operand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{
                "name": "bad",
                "num_qubits": 1,
                "num_clbits": 0,
                "instructions": [
                    {"op": "gate", "gate": {"kind": {"Standard": "X"}}, "qubits": [2]}
                ]
            }"#,
        )
        .unwrap();

        let err = load_circuit(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid circuit"));
    }

    #[test]
    fn test_load_rejects_non_json_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bell.qasm");
        fs::write(&path, "OPENQASM 3.0;\nqubit[2] q;\nh q[0];\n").unwrap();

        let err = load_circuit(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported circuit format '.qasm'"));

        let upper = dir.path().join("BELL.JSON");
        fs::write(&upper, serde_json::to_string(&Circuit::bell().unwrap()).unwrap())
            .unwrap();
        assert!(load_circuit(&upper).is_ok());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_circuit(&path).is_err());
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    #[derive(Parser)]
    #[command(name = "qsv")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Teleport {
            #[arg(long, default_value = "0.3", allow_hyphen_values = true)]
            alpha: f64,
            #[arg(long, default_value = "0.6", allow_hyphen_values = true)]
            beta: f64,
            #[arg(short, long, default_value = "1024")]
            shots: u64,
            #[arg(long)]
            seed: Option<u64>,
            #[arg(short, long)]
            config: Option<String>,
        },
        Run {
            #[arg(short, long)]
            input: String,
            #[arg(short, long, default_value = "1024")]
            shots: u64,
            #[arg(long)]
            seed: Option<u64>,
            #[arg(short, long)]
            config: Option<String>,
            #[arg(short, long, default_value = "table")]
            format: String,
        },
        Version,
    }

    #[test]
    fn test_parse_teleport_defaults() {
        let cli = TestCli::try_parse_from(["qsv", "teleport"]).unwrap();
        match cli.command {
            TestCommands::Teleport {
                alpha,
                beta,
                shots,
                seed,
                config,
            } => {
                assert!((alpha - 0.3).abs() < f64::EPSILON);
                assert!((beta - 0.6).abs() < f64::EPSILON);
                assert_eq!(shots, 1024);
                assert!(seed.is_none());
                assert!(config.is_none());
            }
            _ => panic!("Expected Teleport command"),
        }
    }

    #[test]
    fn test_parse_teleport_with_all_args() {
        let cli = TestCli::try_parse_from([
            "qsv",
            "teleport",
            "--alpha",
            "-0.5",
            "--beta",
            "0.5",
            "-s",
            "10000",
            "--seed",
            "42",
            "-c",
            "qsv.yaml",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Teleport {
                alpha,
                beta,
                shots,
                seed,
                config,
            } => {
                assert!((alpha + 0.5).abs() < f64::EPSILON);
                assert!((beta - 0.5).abs() < f64::EPSILON);
                assert_eq!(shots, 10000);
                assert_eq!(seed, Some(42));
                assert_eq!(config.as_deref(), Some("qsv.yaml"));
            }
            _ => panic!("Expected Teleport command"),
        }
    }

    #[test]
    fn test_parse_teleport_rejects_bad_shots() {
        let result = TestCli::try_parse_from(["qsv", "teleport", "--shots", "many"]);
        assert!(result.is_err());
        let result = TestCli::try_parse_from(["qsv", "teleport", "--shots", "-5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_run_minimal() {
        let cli = TestCli::try_parse_from(["qsv", "run", "-i", "bell.json"]).unwrap();
        match cli.command {
            TestCommands::Run {
                input,
                shots,
                seed,
                config,
                format,
            } => {
                assert_eq!(input, "bell.json");
                assert_eq!(shots, 1024);
                assert!(seed.is_none());
                assert!(config.is_none());
                assert_eq!(format, "table");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_json_format() {
        let cli = TestCli::try_parse_from([
            "qsv", "run", "-i", "c.json", "-s", "100", "--seed", "7", "-f", "json",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Run {
                shots,
                seed,
                format,
                ..
            } => {
                assert_eq!(shots, 100);
                assert_eq!(seed, Some(7));
                assert_eq!(format, "json");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_missing_input() {
        let result = TestCli::try_parse_from(["qsv", "run"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["qsv", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_parse_verbose_flag() {
        let cli = TestCli::try_parse_from(["qsv", "-v", "version"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_verbose_vvv_after_subcommand() {
        let cli = TestCli::try_parse_from(["qsv", "teleport", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_no_subcommand() {
        let result = TestCli::try_parse_from(["qsv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        let result = TestCli::try_parse_from(["qsv", "submit"]);
        assert!(result.is_err());
    }
}
