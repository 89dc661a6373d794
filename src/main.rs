use std::process::ExitCode;

use clap::Parser;
use install_vue::{
    channel::ReleaseChannel,
    commands::{
        config::{DEFAULT_CHANNEL, Options},
        install_vue,
    },
    error::exit_code_for,
    package_manager::PackageManager,
    runtime::RealRuntime,
};

/// install-vue - try a Vue.js pre-release in an existing project
///
/// Points every Vue.js package of the project in the current directory at
/// the chosen release through the package manager's override mechanism,
/// then offers to reinstall dependencies.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for
/// authentication when looking up the latest commit (edge channel).
///
/// Examples:
///   install-vue                           # Latest commit on main
///   install-vue --channel alpha           # alpha dist-tag
///   install-vue --channel version 3.5.3   # A specific version
///   install-vue --channel pr 12345        # Build of a pull request
#[derive(Parser, Debug)]
#[command(author, version = env!("INSTALL_VUE_VERSION"), about)]
struct Cli {
    /// Version, short commit hash or PR number, depending on the channel
    #[arg(value_name = "VERSION")]
    target: Option<String>,

    /// Release channel: alpha, beta, rc, version, commit, pr, edge, canary, canary-minor
    #[arg(long, short = 'c', env = "INSTALL_VUE_CHANNEL", default_value = DEFAULT_CHANNEL)]
    channel: ReleaseChannel,

    /// Package manager to configure instead of detecting it from lockfiles
    #[arg(long, short = 'p', env = "INSTALL_VUE_PACKAGE_MANAGER", value_name = "NAME")]
    package_manager: Option<PackageManager>,

    /// Pin dist-tags (alpha, beta, rc, canary) to the exact version they point at
    #[arg(long)]
    exact: bool,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    /// npm registry URL (defaults to https://registry.npmjs.org)
    #[arg(long = "registry-url", value_name = "URL")]
    registry_url: Option<String>,

    /// Host serving commit and PR builds (defaults to https://pkg.pr.new)
    #[arg(long = "build-host", value_name = "URL")]
    build_host: Option<String>,

    /// Branch followed by the edge channel (defaults to main)
    #[arg(long = "edge-branch", value_name = "BRANCH")]
    edge_branch: Option<String>,
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        Options {
            channel: cli.channel,
            target: cli.target,
            package_manager: cli.package_manager,
            exact: cli.exact,
            api_url: cli.api_url,
            registry_url: cli.registry_url,
            build_host: cli.build_host,
            edge_branch: cli.edge_branch,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    match install_vue(runtime, cli.into()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            if code == 0 {
                println!("{}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(code as u8)
        }
    }
}
