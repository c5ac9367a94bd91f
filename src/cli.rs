use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

use crate::output::OutputFormat;

#[derive(Parser, Debug, Default)]
#[command(
    name = "cfgchain",
    about = "Show which workloads consume each ConfigMap and Secret key in a namespace",
    version
)]
pub struct Args {
    /// Namespace to audit. Default: `default`.
    #[arg(short = 'n', long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Path to kubeconfig file. Defaults to /etc/kubernetes/kubelet.conf when
    /// present, otherwise $KUBECONFIG, ~/.kube/config or the in-cluster account.
    #[arg(short = 'k', long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Use a specific kubeconfig context instead of the current one.
    #[arg(long, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Output format. Default: yaml.
    #[arg(short = 'f', long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Only show sources whose `<kind>/<name>` matches this regex
    /// (e.g. `^secret/`, `configmap/app-.*`).
    #[arg(short = 'c', long, value_name = "REGEX")]
    pub config_name: Option<String>,

    /// Drop namespaces and every empty usage list from the output.
    #[arg(short = 's', long)]
    pub simplify: bool,

    /// Read defaults from this TOML file instead of ~/.config/cfgchain/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print shell completions for SHELL to stdout and exit.
    /// Example: `cfgchain --completions bash >> ~/.bash_completion`
    #[arg(long, value_name = "SHELL", hide = true)]
    pub completions: Option<Shell>,

    /// Print the man page to stdout and exit.
    /// Example: `cfgchain --mangen | gzip > /usr/share/man/man1/cfgchain.1.gz`
    #[arg(long, hide = true)]
    pub mangen: bool,
}

/// Write completions for `shell` to stdout.
pub fn print_completions(shell: Shell) {
    clap_complete::generate(shell, &mut Args::command(), "cfgchain", &mut io::stdout());
}

/// Write the roff man page to stdout.
pub fn print_man_page() -> io::Result<()> {
    clap_mangen::Man::new(Args::command()).render(&mut io::stdout())
}
