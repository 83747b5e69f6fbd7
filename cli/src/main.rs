use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use deso_core::{
    ApiClient, AppendExtraDataParams, AuthorizeDerivedKeyParams, ClientConfig,
    FollowsStatelessParams, HoldersParams, IsHodlingParams, NotificationsParams,
    SingleProfileParams, SubmitTransactionParams, TransactionParams, TransportScope,
    UserDerivedKeysParams, UsersStatelessParams, DEFAULT_BASE_URL,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "deso")]
#[command(about = "Query a DeSo node's public API", long_about = None)]
struct Cli {
    /// Node API root
    #[arg(short, long, env = "DESO_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current exchange rates
    ExchangeRate,
    /// Node settings and block height
    AppState,
    /// Whether one user holds another's creator coin
    IsHodling {
        public_key: String,
        is_hodling_public_key: String,
    },
    /// Look up a profile by public key or username
    Profile {
        #[arg(long)]
        public_key: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
    /// Look up several users at once
    Users {
        #[arg(required = true)]
        public_keys: Vec<String>,
    },
    /// List followers, or with --following, who the user follows
    Follows {
        public_key: String,
        #[arg(long)]
        following: bool,
        #[arg(short, long, default_value_t = 50)]
        num: u64,
    },
    /// List coin holders, or with --hodlings, what the user holds
    Holders(HoldersArgs),
    /// Recent notifications, newest first by default
    Notifications {
        public_key: String,
        #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
        start: i64,
        #[arg(short, long, default_value_t = 50)]
        num: u64,
    },
    /// Look up a transaction by hash
    Txn { txn_hash_hex: String },
    /// Submit a signed transaction
    SubmitTxn { transaction_hex: String },
    /// Build a transaction authorizing (or revoking) a derived key
    AuthorizeDerivedKey {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        derived: String,
        #[arg(long)]
        expiration_block: u64,
        #[arg(long)]
        access_signature: String,
        /// Revoke instead of authorize
        #[arg(long)]
        delete: bool,
        #[arg(long)]
        derived_key_signature: Option<bool>,
        #[arg(long, default_value_t = 1000)]
        min_fee_rate: u64,
    },
    /// Attach KEY=VALUE pairs to a transaction's extra data
    AppendExtraData {
        transaction_hex: String,
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Derived keys registered for a user
    DerivedKeys { public_key: String },
}

#[derive(Args)]
struct HoldersArgs {
    #[arg(long)]
    public_key: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(short, long, default_value_t = 50)]
    num: u64,
    #[arg(long)]
    hodlings: bool,
    #[arg(long)]
    last_public_key: Option<String>,
    #[arg(long)]
    all: bool,
}

impl From<HoldersArgs> for HoldersParams {
    // Unset switches stay off the wire.
    fn from(args: HoldersArgs) -> Self {
        Self {
            public_key: args.public_key,
            username: args.username,
            num_to_fetch: args.num,
            fetch_hodlings: args.hodlings.then_some(true),
            last_public_key: args.last_public_key,
            fetch_all: args.all.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::with_base_url(&cli.base_url)
        .timeout(Duration::from_secs(cli.timeout))
        .scope(TransportScope::Dedicated);
    let client = ApiClient::with_config(config);
    tracing::debug!(base_url = %client.base_url(), "client ready");

    let data = match cli.command {
        Commands::ExchangeRate => client.get_exchange_rate().await?,
        Commands::AppState => client.get_app_state().await?,
        Commands::IsHodling {
            public_key,
            is_hodling_public_key,
        } => {
            client
                .get_is_hodling_public_key(&IsHodlingParams {
                    public_key,
                    is_hodling_public_key,
                })
                .await?
        }
        Commands::Profile {
            public_key,
            username,
        } => {
            client
                .get_single_profile(&SingleProfileParams {
                    public_key,
                    username,
                })
                .await?
        }
        Commands::Users { public_keys } => {
            client
                .get_users_stateless(&UsersStatelessParams { public_keys })
                .await?
        }
        Commands::Follows {
            public_key,
            following,
            num,
        } => {
            client
                .get_follows_stateless(&FollowsStatelessParams {
                    public_key,
                    get_entries_following_username: Some(following),
                    num_to_fetch: num,
                })
                .await?
        }
        Commands::Holders(args) => client.get_holders_for_public_key(&args.into()).await?,
        Commands::Notifications {
            public_key,
            start,
            num,
        } => {
            client
                .get_notifications(&NotificationsParams {
                    public_key,
                    fetch_start_index: start,
                    num_to_fetch: num,
                })
                .await?
        }
        Commands::Txn { txn_hash_hex } => {
            client
                .get_transaction(&TransactionParams { txn_hash_hex })
                .await?
        }
        Commands::SubmitTxn { transaction_hex } => {
            client
                .submit_transaction(&SubmitTransactionParams { transaction_hex })
                .await?
        }
        Commands::AuthorizeDerivedKey {
            owner,
            derived,
            expiration_block,
            access_signature,
            delete,
            derived_key_signature,
            min_fee_rate,
        } => {
            client
                .authorize_derived_key(&AuthorizeDerivedKeyParams {
                    owner_public_key_base58_check: owner,
                    derived_public_key_base58_check: derived,
                    expiration_block,
                    access_signature,
                    delete_key: Some(delete),
                    derived_key_signature,
                    min_fee_rate_nanos_per_kb: min_fee_rate,
                })
                .await?
        }
        Commands::AppendExtraData {
            transaction_hex,
            pairs,
        } => {
            let extra_data = parse_pairs(&pairs)?;
            client
                .append_extra_data(&AppendExtraDataParams {
                    transaction_hex,
                    extra_data,
                })
                .await?
        }
        Commands::DerivedKeys { public_key } => {
            client
                .get_user_derived_keys(&UserDerivedKeysParams {
                    public_key_base58_check: public_key,
                })
                .await?
        }
    };

    match data {
        Some(data) => {
            let pretty = serde_json::to_string_pretty(&data).context("failed to format response")?;
            println!("{pretty}");
        }
        None => println!("(empty response)"),
    }
    Ok(())
}

fn parse_pairs(pairs: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected KEY=VALUE, got `{pair}`");
        };
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}
