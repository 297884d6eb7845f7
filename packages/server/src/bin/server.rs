//! Room-scoped WebSocket chat relay.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-server
//! cargo run --bin parlor-server -- --host 0.0.0.0 --port 3000 --data-file data/messages.jsonl
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use parlor_server::{
    config::{DEFAULT_DATA_FILE, DEFAULT_HOST, DEFAULT_PORT, ServerConfig, StorageConfig},
    domain::MessageStore,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryMessageStore, InMemoryPresenceRegistry, JsonLinesMessageStore},
    },
    ui::Server,
    usecase::{DEFAULT_HISTORY_LIMIT, GetRoomDetailUseCase, GetRoomsUseCase, SessionCoordinator},
};
use parlor_shared::{
    logger::setup_logger,
    time::{MonotonicClock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "parlor-server")]
#[command(about = "Room-scoped WebSocket chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PARLOR_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// JSON Lines file the messages are appended to
    #[arg(long, env = "PARLOR_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Number of messages sent as history
    #[arg(long, env = "PARLOR_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Keep messages in memory only
    #[arg(long)]
    ephemeral: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        let storage = if args.ephemeral {
            StorageConfig::InMemory
        } else {
            StorageConfig::JsonLines(args.data_file)
        };
        Self {
            host: args.host,
            port: args.port,
            storage,
            history_limit: args.history_limit,
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Message store and presence registry
    let store: Arc<dyn MessageStore> = match &config.storage {
        StorageConfig::JsonLines(path) => {
            Arc::new(JsonLinesMessageStore::open(path.clone()).await?)
        }
        StorageConfig::InMemory => {
            tracing::info!("Keeping messages in memory only");
            Arc::new(InMemoryMessageStore::new())
        }
    };
    let registry = Arc::new(InMemoryPresenceRegistry::new());

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. UseCases
    let coordinator = Arc::new(SessionCoordinator::new(
        registry.clone(),
        store,
        message_pusher,
        Arc::new(MonotonicClock::new(SystemClock)),
        config.history_limit,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(
        registry,
        coordinator.history(),
    ));

    // 4. Server
    let result = Server::new(coordinator.clone(), get_rooms_usecase, get_room_detail_usecase)
        .run(&config.bind_addr())
        .await;

    // 5. Write out messages still queued for persistence
    coordinator.flush().await;
    result
}
