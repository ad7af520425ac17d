use super::{check_mark, describe, json_pretty, EXIT_SUCCESS};
use lockenv_core::{EnvGenerator, GenerateOptions};

pub fn run(options: GenerateOptions, json: bool) -> Result<u8, String> {
    let generator = EnvGenerator::new(options);

    if json {
        let report = generator.generate().map_err(|e| describe(&e))?;
        let payload = serde_json::json!({
            "status": "written",
            "path": report.output_path,
            "packages": report.package_count,
            "channels": report.channels,
            "platform": report.platform,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    let opts = generator.options();
    println!("Reading {}...", opts.lock_path.display());
    let env = generator.load().map_err(|e| describe(&e))?;

    println!("Writing {}...", opts.output_path.display());
    let written = generator.write(&env).map_err(|e| describe(&e))?;

    let file_name = written
        .file_name()
        .map_or_else(|| written.display().to_string(), |n| n.to_string_lossy().into_owned());
    println!(
        "{} Successfully created {file_name} with {} pinned packages",
        check_mark(true),
        env.dependencies.len()
    );
    println!("  Channels: {}", env.channels.join(", "));
    println!("  Platform: {}", opts.target.platform);
    Ok(EXIT_SUCCESS)
}
