use super::{check_mark, describe, json_pretty, EXIT_STALE, EXIT_SUCCESS};
use lockenv_core::{CheckStatus, EnvGenerator, GenerateOptions};

pub fn run(options: GenerateOptions, json: bool) -> Result<u8, String> {
    let generator = EnvGenerator::new(options);
    let status = generator.check().map_err(|e| describe(&e))?;
    let opts = generator.options();
    let output = &opts.output_path;

    if json {
        let payload = serde_json::json!({
            "status": status.as_str(),
            "path": output,
            "lockfile": opts.lock_path,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        match status {
            CheckStatus::UpToDate => {
                println!("{} {} is up to date", check_mark(true), output.display());
            }
            CheckStatus::Stale => println!(
                "{} {} is out of date (run '{}')",
                check_mark(false),
                output.display(),
                opts.regenerate_command
            ),
            CheckStatus::Missing => println!(
                "{} {} does not exist (run '{}')",
                check_mark(false),
                output.display(),
                opts.regenerate_command
            ),
        }
    }

    if status == CheckStatus::UpToDate {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_STALE)
    }
}
