mod common;
use std::path::PathBuf;

#[test]
#[cfg(feature = "clap")]
fn recover() {
    let args = common::standard_args();

    let cmd = cartk::clap::SubCommand::Recover {
        args,
        log_and_verbosity: common::silent_verbosity(),
        history: PathBuf::from(common::TEST_HISTORY),
        tree: common::TREE.to_string(),
    };
    cartk::clap::run_cmd(cmd).unwrap();

    // The BC ancestor carries the reversal of block 2, branch A does not.
    let bc = std::fs::read_to_string("tests/results/BC.gen").unwrap();
    assert!(bc.contains("+1 -2 +3 $"));
    assert!(bc.contains("# Reconstructed genome BC has 1 CAR(s)"));

    let a = std::fs::read_to_string("tests/results/A.gen").unwrap();
    assert!(a.contains("+1 +2 +3 $"));

    let trs = std::fs::read_to_string("tests/results/BC.trs").unwrap();
    assert_eq!(trs.trim(), "1h 2h\t2t 3t\tB,C");
    let trs = std::fs::read_to_string("tests/results/A.trs").unwrap();
    assert!(trs.trim().is_empty());

    let summary = std::fs::read_to_string("tests/results/summary.json").unwrap();
    let summary: serde_json::Value = serde_json::from_str(&summary).unwrap();
    assert_eq!(summary["total"]["reversals"], 1);
    assert_eq!(summary["total"]["translocations"], 0);
    assert_eq!(summary["total"]["fissions_fusions"], 0);

    let branches = summary["branches"].as_array().unwrap();
    assert_eq!(branches.len(), 4);
    let bc = branches.iter().find(|b| b["name"] == "BC").unwrap();
    assert_eq!(bc["reversals"], 1);
    assert_eq!(bc["operations"], 1);
    assert_eq!(bc["residual_circular"], 0);
    assert_eq!(bc["fault"], serde_json::Value::Null);
}
