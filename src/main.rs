use anyhow::Result;
use clap::Parser;
use tracing::info;

use cfgchain::{
    audit::audit_namespace,
    cli::{print_completions, print_man_page, Args},
    config::{FileConfig, Settings},
    k8s::client::build_client,
    logging::init_logging,
    output::project,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        print_completions(shell);
        return Ok(());
    }
    if args.mangen {
        print_man_page()?;
        return Ok(());
    }

    init_logging(args.verbose);

    // Configuration errors surface here, before any cluster traffic.
    let file = FileConfig::load(args.config.as_deref())?;
    let settings = Settings::resolve(&args, file)?;

    let kubeconfig = settings.kubeconfig_path();
    let client = build_client(kubeconfig.as_deref(), settings.context.as_deref()).await?;
    info!(
        namespace = %settings.namespace,
        kubeconfig = ?kubeconfig,
        "auditing configuration references"
    );

    let report = audit_namespace(&client, &settings.namespace).await?;

    let view = project(&report.registry, &settings.filter, settings.simplify);
    println!("{}", settings.format.render(&view)?);

    Ok(())
}
