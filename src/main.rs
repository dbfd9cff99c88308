use std::path::PathBuf;

use profile_demo::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let code = CliApp::new("profile-demo")
        .with_args(parse_args)
        .run(std::env::args().collect(), publish_demo_data)
        .await;
    std::process::exit(code);
}

/// The demo takes no arguments and always writes to the fixed log directory
fn parse_args(args: Vec<String>) -> Result<PathBuf, AppError> {
    if args.len() > 1 {
        return Err(AppError::InvalidArguments("Usage: profile-demo".to_string()));
    }
    Ok(PathBuf::from(LOGDIR))
}

async fn publish_demo_data(logdir: PathBuf) -> Result<(), AppError> {
    println!("Saving output to {}.", logdir.display());

    let config = DemoConfig::demo()?;
    dump_data(&logdir, &config).await?;

    println!("Done. Output saved to {}.", logdir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_targets_logdir() {
        let logdir = parse_args(vec!["profile-demo".to_string()]).unwrap();
        assert_eq!(logdir, PathBuf::from(LOGDIR));
    }

    #[test]
    fn extra_arguments_are_rejected() {
        let result = parse_args(vec!["profile-demo".to_string(), "x".to_string()]);
        match result {
            Err(AppError::InvalidArguments(msg)) => assert_eq!(msg, "Usage: profile-demo"),
            other => panic!("expected usage error, got {other:?}"),
        }
    }
}
