use polyfall_engine::GameConfig;

pub(crate) fn run() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&GameConfig::default())?;
    println!("{json}");
    Ok(())
}
