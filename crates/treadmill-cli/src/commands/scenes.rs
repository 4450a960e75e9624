use treadmill_core::ScenePreset;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let scenes = ScenePreset::all();
    println!("{}", serde_json::to_string_pretty(&scenes)?);
    Ok(())
}
