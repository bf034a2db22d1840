mod common;
use std::path::PathBuf;

#[test]
#[cfg(feature = "clap")]
fn karyotype() {
    let args = common::standard_args();

    let cmd = cartk::clap::SubCommand::Karyotype {
        args,
        log_and_verbosity: common::silent_verbosity(),
    };
    cartk::clap::run_cmd(cmd).unwrap();

    let res = std::fs::read_to_string("tests/results/karyotype.csv").unwrap();
    let mut lines = res.lines();
    assert_eq!(lines.next(), Some("genome,blocks,chromosomes,circular"));
    assert_eq!(lines.next(), Some("A,3,1,0"));
    assert_eq!(lines.next(), Some("B,3,1,0"));
    assert_eq!(lines.next(), Some("C,3,1,0"));
}

#[test]
#[cfg(feature = "clap")]
fn karyotype_circular() {
    let args = cartk::args::StandardArgs {
        file: PathBuf::from(common::TEST_CIRCULAR),
        prefix: Some("circ".to_string()),
        ..common::standard_args()
    };

    let cmd = cartk::clap::SubCommand::Karyotype {
        args,
        log_and_verbosity: common::silent_verbosity(),
    };
    cartk::clap::run_cmd(cmd).unwrap();

    let res = std::fs::read_to_string("tests/results/circ_karyotype.csv").unwrap();
    assert!(res.contains("A,3,2,1"));
    assert!(res.contains("B,3,2,1"));
}
