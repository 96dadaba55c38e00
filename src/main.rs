use precision_probe::probe::{self, ProbeConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let report = probe::run(&ProbeConfig::default())?;
    println!("{report}");
    Ok(())
}
