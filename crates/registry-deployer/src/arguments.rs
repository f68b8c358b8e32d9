use {
    alloy::signers::local::PrivateKeySigner,
    std::{
        ffi::OsString,
        fmt::{self, Display, Formatter},
        path::{Path, PathBuf},
    },
    tracing::level_filters::LevelFilter,
    url::Url,
};

/// Environment file written to, and loaded into the process environment
/// before arguments are parsed.
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(clap::Parser)]
#[clap(about = "Deploys the identity registry contract and records its address")]
pub struct Arguments {
    #[clap(long, env, default_value = "warn,registry_deployer=info")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// The Ethereum node URL to connect to.
    #[clap(long, env = "RPC_URL", default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Private key of the deploying account. When absent the first account
    /// managed by the node is used.
    #[clap(long, env)]
    pub owner_key: Option<PrivateKeySigner>,

    /// Directory holding the Hardhat compilation artifacts.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Name of the contract to deploy.
    #[clap(long, env, default_value = "IdentityRegistry")]
    pub contract_name: String,

    /// File the deployed address is written to. Its entries are loaded into
    /// the environment before the other arguments are read, so it may also
    /// hold `RPC_URL` or `OWNER_KEY`.
    #[clap(long, env, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Key under which the deployed address is stored.
    #[clap(long, env, default_value = "REGISTRY_ADDR")]
    pub env_key: String,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            node_url,
            owner_key,
            artifacts_dir,
            contract_name,
            env_file,
            env_key,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "node_url: {node_url}")?;
        display_secret_option(f, "owner_key", owner_key)?;
        writeln!(f, "artifacts_dir: {}", artifacts_dir.display())?;
        writeln!(f, "contract_name: {contract_name}")?;
        writeln!(f, "env_file: {}", env_file.display())?;
        writeln!(f, "env_key: {env_key}")?;
        Ok(())
    }
}

fn display_secret_option<T>(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<T>,
) -> fmt::Result {
    let value = if option.is_some() { "SECRET" } else { "None" };
    writeln!(f, "{name}: {value}")
}

/// The environment file named by `--env-file` in `args`, else by `ENV_FILE`,
/// else [`DEFAULT_ENV_FILE`].
pub fn env_file_path<I>(args: I) -> PathBuf
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter().skip(1);
    let mut path = None;
    while let Some(arg) = args.next() {
        if arg == "--env-file" {
            path = args.next().map(PathBuf::from);
        } else if let Some(value) = arg.to_str().and_then(|arg| arg.strip_prefix("--env-file="))
        {
            path = Some(PathBuf::from(value));
        }
    }
    path.or_else(|| std::env::var_os("ENV_FILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE))
}

/// Loads the environment file at `path` into the process environment so that
/// values like `RPC_URL` or `OWNER_KEY` kept there configure the run.
/// Variables that are already set win. Returns `false` if there was no such
/// file.
pub fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err),
    }
}
