//! Session Orchestrator (RPC Engine): the top-level state machine. Owns
//! the transport and the entity mirror, drives the update cycle, version
//! handshake, connection lifecycle, auto-reconnect, and per-torrent
//! sub-fetches (spec.md §2, §4.4).
//!
//! Runs as a single engine task draining commands from an
//! [`mpsc::Receiver`] in order — the same "one thing at a time" guarantee
//! the source gets from its single-threaded event loop, kept here by
//! funnelling every external call through one channel instead of shared
//! mutable state (spec.md §9 "Observer pattern", "Back-pointers").

mod add_torrent;
mod handshake;
mod state;
mod update_cycle;
mod writes;

pub use add_torrent::AddTorrentOutcome;
pub use state::{ConnectionState, Status};

use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::config::ServerConfig;
use crate::error::ErrorKind;
use crate::models::{ServerSettings, ServerStats, Torrent};
use crate::net;
use crate::parameters::AddTorrentParams;
use crate::reconciler::ReconcileReport;
use crate::transport::{PostError, RequestFailure, Transport};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Signals observers can subscribe to via [`Session::subscribe_events`]
/// (spec.md §9 "Observer pattern"). Field snapshots (settings/stats/
/// torrents) are read through the `watch` channels instead of being
/// carried on the event itself, so a slow subscriber can't fall behind
/// on state, only on the fact that *a* change happened.
#[derive(Debug, Clone)]
pub enum Event {
    StatusChanged(Status),
    /// Fires alongside `StatusChanged` whenever the connected/disconnected
    /// half of the state actually flips, for observers that only care
    /// about that bit (spec.md §4.5).
    ConnectedChanged(bool),
    /// Fires alongside `StatusChanged` whenever `error` changes, including
    /// back to `NoError` on a fresh connect (spec.md §4.5).
    ErrorChanged(ErrorKind),
    AboutToDisconnect,
    ConnectionCompleted,
    SettingsChanged,
    StatsChanged,
    TorrentsChanged(ReconcileReport),
    TorrentAdded(Torrent),
    TorrentFinished(Torrent),
    TorrentAddDuplicate { id: Option<i64> },
    TorrentAddError(String),
    TorrentFileRenamed { torrent_id: i64, path: String, new_name: String },
    GotDownloadDirFreeSpace(Option<i64>),
    GotFreeSpaceForPath { path: String, bytes: Option<i64> },
}

/// One write operation dispatched through the engine task (spec.md §6
/// method list, minus `session-get`/`torrent-get`/`session-stats`/
/// `torrent-add`, which have dedicated handling).
#[derive(Debug, Clone)]
pub enum WriteOp {
    TorrentSet { ids: Vec<i64>, fields: Value },
    TorrentStart(Vec<i64>),
    TorrentStartNow(Vec<i64>),
    TorrentStop(Vec<i64>),
    TorrentVerify(Vec<i64>),
    TorrentReannounce(Vec<i64>),
    TorrentRemove { ids: Vec<i64>, delete_local_data: bool },
    TorrentSetLocation { ids: Vec<i64>, location: String, move_data: bool },
    TorrentRenamePath { id: i64, path: String, name: String },
    QueueMoveTop(Vec<i64>),
    QueueMoveUp(Vec<i64>),
    QueueMoveDown(Vec<i64>),
    QueueMoveBottom(Vec<i64>),
    SessionSet(Value),
}

enum Command {
    Connect,
    Disconnect,
    Reconfigure(ServerConfig),
    UpdateData,
    SetTorrentSubFetch { id: i64, files: Option<bool>, peers: Option<bool> },
    Write(WriteOp, oneshot::Sender<Result<bool, PostError>>),
    AddTorrent(AddTorrentParams, oneshot::Sender<Result<AddTorrentOutcome, PostError>>),
    FreeSpace(String, oneshot::Sender<Result<Option<i64>, PostError>>),
    DownloadDirFreeSpace(oneshot::Sender<Result<Option<i64>, PostError>>),
}

/// Public handle to a running session. Cloning shares the same engine
/// task; dropping every clone stops it.
#[derive(Clone)]
pub struct Session {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<Status>,
    torrents: watch::Receiver<Vec<Torrent>>,
    settings: watch::Receiver<ServerSettings>,
    stats: watch::Receiver<ServerStats>,
    is_local: watch::Receiver<Option<bool>>,
    events: broadcast::Sender<Event>,
}

impl Session {
    /// Spawn the engine task and return a handle to it. No server is
    /// configured until [`Session::reconfigure`] is called.
    pub fn spawn() -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (status_tx, status_rx) = watch::channel(Status::default());
        let (torrents_tx, torrents_rx) = watch::channel(Vec::new());
        let (settings_tx, settings_rx) = watch::channel(ServerSettings::default());
        let (stats_tx, stats_rx) = watch::channel(ServerStats::default());
        let (is_local_tx, is_local_rx) = watch::channel(None);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let engine = Engine {
            transport: Transport::new(),
            config: None,
            settings: ServerSettings::default(),
            stats: ServerStats::default(),
            torrents: Vec::new(),
            status_tx,
            torrents_tx,
            settings_tx,
            stats_tx,
            is_local_tx,
            events_tx: events_tx.clone(),
            self_commands: command_tx.clone(),
            reconnect_handle: None,
            locality_handle: None,
        };
        tokio::spawn(engine.run(command_rx));

        Self {
            commands: command_tx,
            status: status_rx,
            torrents: torrents_rx,
            settings: settings_rx,
            stats: stats_rx,
            is_local: is_local_rx,
            events: events_tx,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn status(&self) -> watch::Receiver<Status> {
        self.status.clone()
    }

    pub fn torrents(&self) -> watch::Receiver<Vec<Torrent>> {
        self.torrents.clone()
    }

    /// Looks up a torrent by its connection-lifetime id in the current
    /// snapshot (spec.md §4.5 `torrent_by_id`).
    pub fn torrent_by_id(&self, id: i64) -> Option<Torrent> {
        self.torrents.borrow().iter().find(|t| t.id == id).cloned()
    }

    /// Looks up a torrent by its cross-session-stable hash in the current
    /// snapshot (spec.md §4.5 `torrent_by_hash`).
    pub fn torrent_by_hash(&self, hash_string: &str) -> Option<Torrent> {
        self.torrents.borrow().iter().find(|t| t.hash_string == hash_string).cloned()
    }

    pub fn settings(&self) -> watch::Receiver<ServerSettings> {
        self.settings.clone()
    }

    pub fn stats(&self) -> watch::Receiver<ServerStats> {
        self.stats.clone()
    }

    /// `None` while locality resolution for the current configuration is
    /// still in flight (spec.md §4.4 "Locality detection").
    pub fn is_local(&self) -> watch::Receiver<Option<bool>> {
        self.is_local.clone()
    }

    pub async fn reconfigure(&self, config: ServerConfig) {
        let _ = self.commands.send(Command::Reconfigure(config)).await;
    }

    pub async fn connect(&self) {
        let _ = self.commands.send(Command::Connect).await;
    }

    pub async fn disconnect(&self) {
        let _ = self.commands.send(Command::Disconnect).await;
    }

    pub async fn update_data(&self) {
        let _ = self.commands.send(Command::UpdateData).await;
    }

    /// Gate whether the update cycle fetches `files`/`peers` for one
    /// torrent each tick (spec.md §3 `files_enabled`/`peers_enabled`).
    pub async fn set_torrent_sub_fetch(&self, id: i64, files: Option<bool>, peers: Option<bool>) {
        let _ = self
            .commands
            .send(Command::SetTorrentSubFetch { id, files, peers })
            .await;
    }

    async fn write(&self, op: WriteOp) -> Result<bool, PostError> {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Write(op, tx)).await.is_err() {
            return Err(PostError::Cancelled);
        }
        rx.await.unwrap_or(Err(PostError::Cancelled))
    }

    pub async fn torrent_set(&self, ids: Vec<i64>, fields: Value) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentSet { ids, fields }).await
    }

    pub async fn torrent_start(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentStart(ids)).await
    }

    pub async fn torrent_start_now(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentStartNow(ids)).await
    }

    pub async fn torrent_stop(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentStop(ids)).await
    }

    pub async fn torrent_verify(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentVerify(ids)).await
    }

    pub async fn torrent_reannounce(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentReannounce(ids)).await
    }

    pub async fn torrent_remove(&self, ids: Vec<i64>, delete_local_data: bool) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentRemove { ids, delete_local_data }).await
    }

    pub async fn torrent_set_location(
        &self,
        ids: Vec<i64>,
        location: String,
        move_data: bool,
    ) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentSetLocation { ids, location, move_data }).await
    }

    pub async fn torrent_rename_path(&self, id: i64, path: String, name: String) -> Result<bool, PostError> {
        self.write(WriteOp::TorrentRenamePath { id, path, name }).await
    }

    pub async fn queue_move_top(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::QueueMoveTop(ids)).await
    }

    pub async fn queue_move_up(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::QueueMoveUp(ids)).await
    }

    pub async fn queue_move_down(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::QueueMoveDown(ids)).await
    }

    pub async fn queue_move_bottom(&self, ids: Vec<i64>) -> Result<bool, PostError> {
        self.write(WriteOp::QueueMoveBottom(ids)).await
    }

    pub async fn session_set(&self, changes: Value) -> Result<bool, PostError> {
        self.write(WriteOp::SessionSet(changes)).await
    }

    pub async fn add_torrent(&self, params: AddTorrentParams) -> Result<AddTorrentOutcome, PostError> {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::AddTorrent(params, tx)).await.is_err() {
            return Err(PostError::Cancelled);
        }
        rx.await.unwrap_or(Err(PostError::Cancelled))
    }

    pub async fn free_space(&self, path: String) -> Result<Option<i64>, PostError> {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::FreeSpace(path, tx)).await.is_err() {
            return Err(PostError::Cancelled);
        }
        rx.await.unwrap_or(Err(PostError::Cancelled))
    }

    /// Free space under the server's configured download directory,
    /// distinct from [`Session::free_space`] which asks about an
    /// arbitrary path (spec.md §6).
    pub async fn download_dir_free_space(&self) -> Result<Option<i64>, PostError> {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::DownloadDirFreeSpace(tx)).await.is_err() {
            return Err(PostError::Cancelled);
        }
        rx.await.unwrap_or(Err(PostError::Cancelled))
    }
}

struct Engine {
    transport: Transport,
    config: Option<ServerConfig>,
    settings: ServerSettings,
    stats: ServerStats,
    torrents: Vec<Torrent>,
    status_tx: watch::Sender<Status>,
    torrents_tx: watch::Sender<Vec<Torrent>>,
    settings_tx: watch::Sender<ServerSettings>,
    stats_tx: watch::Sender<ServerStats>,
    is_local_tx: watch::Sender<Option<bool>>,
    events_tx: broadcast::Sender<Event>,
    /// A clone of the engine's own command channel, used by
    /// `schedule_reconnect` to deliver a delayed `Connect` without the
    /// caller having to keep a `Session` handle alive.
    self_commands: mpsc::Sender<Command>,
    /// The pending auto-reconnect timer, if one is armed; aborted by an
    /// explicit `disconnect()`/`reconfigure()` (spec.md §4.4
    /// "Auto-reconnect").
    reconnect_handle: Option<tokio::task::JoinHandle<()>>,
    /// The in-flight locality resolution for the current configuration,
    /// if any (spec.md §4.4 "Locality detection").
    locality_handle: Option<tokio::task::JoinHandle<()>>,
}

impl Engine {
    fn set_status(&self, status: Status) {
        let previous = self.status_tx.borrow().clone();
        let was_connected = previous.state == ConnectionState::Connected;
        let is_connected = status.state == ConnectionState::Connected;
        let error_changed = previous.error != status.error;
        let error = status.error;
        let _ = self.status_tx.send(status.clone());
        let _ = self.events_tx.send(Event::StatusChanged(status));
        if was_connected != is_connected {
            let _ = self.events_tx.send(Event::ConnectedChanged(is_connected));
        }
        if error_changed {
            let _ = self.events_tx.send(Event::ErrorChanged(error));
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        let mut next_tick: Option<tokio::time::Instant> = None;

        loop {
            let sleep = async {
                match next_tick {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(command) => self.handle_command(command, &mut next_tick).await,
                        None => break,
                    }
                }
                _ = sleep => {
                    next_tick = None;
                    self.run_cycle().await;
                    self.schedule_next_tick(&mut next_tick);
                }
            }
        }
    }

    fn schedule_next_tick(&self, next_tick: &mut Option<tokio::time::Instant>) {
        if self.status_tx.borrow().state != ConnectionState::Connected {
            return;
        }
        if let Some(config) = &self.config {
            *next_tick = Some(
                tokio::time::Instant::now()
                    + std::time::Duration::from_secs(config.timings.update_interval_seconds),
            );
        }
    }

    async fn handle_command(&mut self, command: Command, next_tick: &mut Option<tokio::time::Instant>) {
        match command {
            Command::Reconfigure(config) => {
                self.disconnect_internal().await;
                self.start_locality_detection(&config.address);
                self.config = Some(config);
            }
            Command::Connect => {
                self.connect(next_tick).await;
            }
            Command::Disconnect => {
                if self.status_tx.borrow().state == ConnectionState::Connected {
                    let _ = writes::session_close(&self.transport).await;
                }
                self.disconnect_internal().await;
            }
            Command::UpdateData => {
                if self.status_tx.borrow().state == ConnectionState::Connected {
                    self.run_cycle().await;
                    self.schedule_next_tick(next_tick);
                }
            }
            Command::SetTorrentSubFetch { id, files, peers } => {
                if let Some(torrent) = self.torrents.iter_mut().find(|t| t.id == id) {
                    if let Some(files) = files {
                        torrent.files_enabled = files;
                    }
                    if let Some(peers) = peers {
                        torrent.peers_enabled = peers;
                    }
                }
            }
            Command::Write(op, respond) => {
                let rename = match &op {
                    WriteOp::TorrentRenamePath { id, path, name } => {
                        Some((*id, path.clone(), name.clone()))
                    }
                    _ => None,
                };
                let result = self.dispatch_write(&op).await;
                if let Ok(true) = result {
                    if let Some((id, path, name)) = rename {
                        self.apply_rename_path(id, &path, &name);
                    }
                    // The write changed visible state; re-sync (spec.md
                    // §4.4 "Write operations").
                    self.run_cycle().await;
                    self.schedule_next_tick(next_tick);
                }
                let _ = respond.send(result);
            }
            Command::AddTorrent(params, respond) => {
                let result = add_torrent::add_torrent(&self.transport, &params).await;
                match &result {
                    Ok(AddTorrentOutcome::Duplicate(id)) => {
                        let _ = self.events_tx.send(Event::TorrentAddDuplicate { id: *id });
                    }
                    Ok(AddTorrentOutcome::Added(Some(id))) => {
                        for (path, name) in &params.renamed_files {
                            let _ = writes::torrent_rename_path(&self.transport, *id, path, name).await;
                        }
                        self.run_cycle().await;
                        self.schedule_next_tick(next_tick);
                    }
                    Ok(AddTorrentOutcome::Added(None)) => {
                        self.run_cycle().await;
                        self.schedule_next_tick(next_tick);
                    }
                    Ok(AddTorrentOutcome::Rejected) => {
                        let _ = self
                            .events_tx
                            .send(Event::TorrentAddError("torrent-add was rejected".into()));
                    }
                    Err(_) => {}
                }
                let _ = respond.send(result);
            }
            Command::FreeSpace(path, respond) => {
                let result = writes::free_space(&self.transport, &path).await;
                if let Ok(bytes) = result {
                    let _ = self
                        .events_tx
                        .send(Event::GotFreeSpaceForPath { path, bytes });
                }
                let _ = respond.send(result);
            }
            Command::DownloadDirFreeSpace(respond) => {
                let result = writes::download_dir_free_space(&self.transport).await;
                if let Ok(bytes) = result {
                    let _ = self.events_tx.send(Event::GotDownloadDirFreeSpace(bytes));
                }
                let _ = respond.send(result);
            }
        }
    }

    /// Mutates the matching torrent's file path in place and emits
    /// `torrent_file_renamed` (spec.md §4.4 "Write operations").
    fn apply_rename_path(&mut self, torrent_id: i64, path: &str, new_name: &str) {
        if let Some(torrent) = self.torrents.iter_mut().find(|t| t.id == torrent_id) {
            let old_parts: Vec<&str> = path.split('/').collect();
            for file in torrent.files.iter_mut() {
                let matches = file.path.len() >= old_parts.len()
                    && file.path[..old_parts.len()].iter().map(String::as_str).eq(old_parts.iter().copied());
                if matches {
                    file.path[old_parts.len() - 1] = new_name.to_string();
                }
            }
        }
        let _ = self.events_tx.send(Event::TorrentFileRenamed {
            torrent_id,
            path: path.to_string(),
            new_name: new_name.to_string(),
        });
    }

    async fn connect(&mut self, next_tick: &mut Option<tokio::time::Instant>) {
        let Some(config) = self.config.clone() else {
            return;
        };
        if let Err(err) = self.transport.configure(config).await {
            self.set_status(Status::disconnected(
                ErrorKind::ConnectionError,
                err.to_string(),
                String::new(),
            ));
            return;
        }

        self.set_status(Status::connecting());

        match handshake::negotiate(&self.transport).await {
            handshake::HandshakeOutcome::Connected(settings) => {
                self.settings = settings;
                let _ = self.settings_tx.send(self.settings.clone());
                self.set_status(Status::connected());
                self.run_cycle().await;
                if !self.transport.has_pending_data_update_requests() {
                    let _ = self.events_tx.send(Event::ConnectionCompleted);
                }
                self.schedule_next_tick(next_tick);
            }
            handshake::HandshakeOutcome::ServerIsTooOld => {
                self.fail_connect(ErrorKind::ServerIsTooOld, "server rpc-version is too old");
            }
            handshake::HandshakeOutcome::ServerIsTooNew => {
                self.fail_connect(ErrorKind::ServerIsTooNew, "server requires a newer client");
            }
            handshake::HandshakeOutcome::Failed(failure) => {
                self.fail_connect(failure.kind, &failure.message);
            }
            handshake::HandshakeOutcome::Cancelled => {}
        }
    }

    fn fail_connect(&mut self, kind: ErrorKind, message: &str) {
        let _ = self.events_tx.send(Event::AboutToDisconnect);
        self.set_status(Status::disconnected(kind, message, String::new()));

        let auto_reconnect = self
            .config
            .as_ref()
            .map(|c| c.timings.auto_reconnect)
            .unwrap_or(false);
        let retryable = matches!(kind, ErrorKind::TimedOut | ErrorKind::ConnectionError);
        if auto_reconnect && retryable {
            self.schedule_reconnect();
        }
    }

    /// Resolve whether `address` is this host off the async runtime,
    /// without blocking the connection attempt on the result (spec.md
    /// §4.4 "Locality detection").
    fn start_locality_detection(&mut self, address: &str) {
        if let Some(handle) = self.locality_handle.take() {
            handle.abort();
        }
        let _ = self.is_local_tx.send(None);
        let is_local_tx = self.is_local_tx.clone();
        let address = address.to_string();
        self.locality_handle = Some(tokio::spawn(async move {
            let local = tokio::task::spawn_blocking(move || net::is_local_address(&address))
                .await
                .unwrap_or(false);
            let _ = is_local_tx.send(Some(local));
        }));
    }

    async fn disconnect_internal(&mut self) {
        if let Some(handle) = self.reconnect_handle.take() {
            handle.abort();
        }
        if self.status_tx.borrow().state == ConnectionState::Disconnected {
            return;
        }
        let _ = self.events_tx.send(Event::AboutToDisconnect);
        self.transport.cancel_pending_and_clear_session_id().await;

        let removed_count = self.torrents.len();
        self.torrents.clear();
        let _ = self.torrents_tx.send(Vec::new());
        if removed_count > 0 {
            let _ = self.events_tx.send(Event::TorrentsChanged(ReconcileReport {
                removed: vec![(0, removed_count)],
                changed: Vec::new(),
                added: 0,
            }));
        }

        self.set_status(Status::default());
    }

    async fn run_cycle(&mut self) {
        match update_cycle::run(&self.transport, &mut self.settings, &mut self.stats, &mut self.torrents).await {
            Ok(report) => {
                if report.settings_changed {
                    let _ = self.settings_tx.send(self.settings.clone());
                    let _ = self.events_tx.send(Event::SettingsChanged);
                }
                if report.stats_changed {
                    let _ = self.stats_tx.send(self.stats.clone());
                    let _ = self.events_tx.send(Event::StatsChanged);
                }
                let _ = self.torrents_tx.send(self.torrents.clone());
                if report.torrents.is_not_empty() {
                    let _ = self.events_tx.send(Event::TorrentsChanged(report.torrents));
                }
                for id in &report.added_torrent_ids {
                    if let Some(torrent) = self.torrents.iter().find(|t| t.id == *id) {
                        let _ = self.events_tx.send(Event::TorrentAdded(torrent.clone()));
                    }
                }
                for id in &report.finished_torrent_ids {
                    if let Some(torrent) = self.torrents.iter().find(|t| t.id == *id) {
                        let _ = self.events_tx.send(Event::TorrentFinished(torrent.clone()));
                    }
                }
            }
            Err(update_cycle::CycleError::Failed(failure)) => {
                self.handle_request_failure(failure).await;
            }
            Err(update_cycle::CycleError::Cancelled) => {}
        }
    }

    async fn handle_request_failure(&mut self, failure: RequestFailure) {
        let _ = self.events_tx.send(Event::AboutToDisconnect);
        self.transport.cancel_pending_and_clear_session_id().await;
        self.set_status(Status::disconnected(failure.kind, failure.message, failure.detailed_message));

        let auto_reconnect = self
            .config
            .as_ref()
            .map(|c| c.timings.auto_reconnect)
            .unwrap_or(false);
        let retryable = matches!(failure.kind, ErrorKind::TimedOut | ErrorKind::ConnectionError);
        if auto_reconnect && retryable {
            self.schedule_reconnect();
        }
    }

    /// Arms a single-shot reconnect timer, replacing any previously armed
    /// one (spec.md §4.4 "Auto-reconnect").
    fn schedule_reconnect(&mut self) {
        let Some(config) = self.config.clone() else {
            return;
        };
        if let Some(handle) = self.reconnect_handle.take() {
            handle.abort();
        }
        let commands = self.self_commands.clone();
        let interval = std::time::Duration::from_secs(config.timings.auto_reconnect_interval_seconds);
        self.reconnect_handle = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = commands.send(Command::Connect).await;
        }));
    }

    async fn dispatch_write(&self, op: &WriteOp) -> Result<bool, PostError> {
        match op {
            WriteOp::TorrentSet { ids, fields } => {
                writes::torrent_set(&self.transport, ids, fields.clone()).await
            }
            WriteOp::TorrentStart(ids) => writes::torrent_start(&self.transport, ids).await,
            WriteOp::TorrentStartNow(ids) => writes::torrent_start_now(&self.transport, ids).await,
            WriteOp::TorrentStop(ids) => writes::torrent_stop(&self.transport, ids).await,
            WriteOp::TorrentVerify(ids) => writes::torrent_verify(&self.transport, ids).await,
            WriteOp::TorrentReannounce(ids) => writes::torrent_reannounce(&self.transport, ids).await,
            WriteOp::TorrentRemove { ids, delete_local_data } => {
                writes::torrent_remove(&self.transport, ids, *delete_local_data).await
            }
            WriteOp::TorrentSetLocation { ids, location, move_data } => {
                writes::torrent_set_location(&self.transport, ids, location, *move_data).await
            }
            WriteOp::TorrentRenamePath { id, path, name } => {
                writes::torrent_rename_path(&self.transport, *id, path, name).await
            }
            WriteOp::QueueMoveTop(ids) => writes::queue_move_top(&self.transport, ids).await,
            WriteOp::QueueMoveUp(ids) => writes::queue_move_up(&self.transport, ids).await,
            WriteOp::QueueMoveDown(ids) => writes::queue_move_down(&self.transport, ids).await,
            WriteOp::QueueMoveBottom(ids) => writes::queue_move_bottom(&self.transport, ids).await,
            WriteOp::SessionSet(changes) => writes::session_set(&self.transport, changes.clone()).await,
        }
    }
}
