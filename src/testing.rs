//! In-memory network fakes for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::common::{
    CounterSet, HomeMessage, HomeMessageContent, NetworkError, NetworkResult, PresenceEvent,
    RemoteMessage, RemoteUser, StreamEvent,
};
use crate::common::messages::Operation;
use crate::network::{
    GhostUser, HomeSender, IdentityResolver, NameMangler, RemoteClient, RemoteRoom, Services,
    UserMapper,
};

pub const OWN_USER_ID: &str = "gitter-bot-id";
pub const REMOTE_ROOM_ID: &str = "5f1a00000000000000000001";

pub struct FakeIdentity {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl IdentityResolver for FakeIdentity {
    async fn resolve_own_remote_identity(&self) -> NetworkResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(NetworkError::Unreachable);
        }
        Ok(OWN_USER_ID.to_string())
    }
}

#[derive(Default)]
pub struct FakeRemoteRoom {
    pub sent: Mutex<Vec<String>>,
    pub statuses: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
    pub disconnects: AtomicUsize,
    pub fail_send: AtomicBool,
    pub fail_remove: AtomicBool,
    message_tx: Mutex<Option<mpsc::UnboundedSender<StreamEvent>>>,
    presence_tx: Mutex<Option<mpsc::UnboundedSender<PresenceEvent>>>,
}

impl FakeRemoteRoom {
    /// Push an event into the live message stream. False once disconnected.
    pub fn push_event(&self, event: StreamEvent) -> bool {
        match self.message_tx.lock().unwrap().as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    pub fn push_presence(&self, event: PresenceEvent) -> bool {
        match self.presence_tx.lock().unwrap().as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteRoom for FakeRemoteRoom {
    fn id(&self) -> &str {
        REMOTE_ROOM_ID
    }

    fn subscribe_messages(&self) -> mpsc::UnboundedReceiver<StreamEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.message_tx.lock().unwrap() = Some(tx);
        rx
    }

    fn subscribe_presence(&self) -> mpsc::UnboundedReceiver<PresenceEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.presence_tx.lock().unwrap() = Some(tx);
        rx
    }

    async fn send(&self, text: &str) -> NetworkResult<()> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(NetworkError::Rejected {
                message: "rate limited".to_string(),
            });
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_status(&self, text: &str) -> NetworkResult<()> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(NetworkError::Unreachable);
        }
        self.statuses.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn remove_user(&self, user_id: &str) -> NetworkResult<()> {
        self.removed.lock().unwrap().push(user_id.to_string());
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(NetworkError::Unreachable);
        }
        Ok(())
    }

    fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        *self.message_tx.lock().unwrap() = None;
        *self.presence_tx.lock().unwrap() = None;
    }
}

pub struct FakeRemoteClient {
    pub room: Arc<FakeRemoteRoom>,
    pub fail: AtomicBool,
    pub joined: Mutex<Vec<String>>,
}

#[async_trait]
impl RemoteClient for FakeRemoteClient {
    async fn join(&self, room_name: &str) -> NetworkResult<Arc<dyn RemoteRoom>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NetworkError::NotFound {
                what: room_name.to_string(),
            });
        }
        self.joined.lock().unwrap().push(room_name.to_string());
        let room: Arc<dyn RemoteRoom> = self.room.clone();
        Ok(room)
    }
}

/// Records every send; rooms in `failing` reject.
#[derive(Default)]
pub struct FakeHomeSender {
    pub sent: Mutex<Vec<(String, HomeMessageContent)>>,
    pub failing: Mutex<HashSet<String>>,
}

impl FakeHomeSender {
    pub fn fail_room(&self, room_id: &str) {
        self.failing.lock().unwrap().insert(room_id.to_string());
    }

    pub fn sent(&self) -> Vec<(String, HomeMessageContent)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn rooms(&self) -> Vec<String> {
        let mut rooms: Vec<String> = self.sent().into_iter().map(|(room, _)| room).collect();
        rooms.sort();
        rooms
    }
}

#[async_trait]
impl HomeSender for FakeHomeSender {
    async fn send_message(&self, room_id: &str, content: &HomeMessageContent) -> NetworkResult<()> {
        if self.failing.lock().unwrap().contains(room_id) {
            return Err(NetworkError::Rejected {
                message: format!("forbidden in {}", room_id),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((room_id.to_string(), content.clone()));
        Ok(())
    }
}

pub struct FakeGhost {
    pub intent: Arc<FakeHomeSender>,
    pub fail_update: bool,
    pub updates: AtomicUsize,
    pub presence: Mutex<Vec<(String, bool)>>,
}

#[async_trait]
impl GhostUser for FakeGhost {
    async fn update(&self, _from: &RemoteUser) -> NetworkResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_update {
            return Err(NetworkError::Other("avatar upload rejected".to_string()));
        }
        Ok(())
    }

    async fn set_room_presence(&self, remote_room_id: &str, online: bool) {
        self.presence
            .lock()
            .unwrap()
            .push((remote_room_id.to_string(), online));
    }

    fn send_intent(&self) -> Arc<dyn HomeSender> {
        self.intent.clone()
    }
}

/// Creates one ghost per Gitter user ID, all sending through `intent`.
pub struct FakeUserMapper {
    pub intent: Arc<FakeHomeSender>,
    pub ghosts: Mutex<HashMap<String, Arc<FakeGhost>>>,
    pub fail_update: AtomicBool,
    pub fail_mapping: AtomicBool,
}

impl FakeUserMapper {
    pub fn ghost(&self, user_id: &str) -> Option<Arc<FakeGhost>> {
        self.ghosts.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl UserMapper for FakeUserMapper {
    async fn map_remote_user(&self, from: &RemoteUser) -> NetworkResult<Arc<dyn GhostUser>> {
        if self.fail_mapping.load(Ordering::SeqCst) {
            return Err(NetworkError::Unreachable);
        }
        let fail_update = self.fail_update.load(Ordering::SeqCst);
        let ghost = self
            .ghosts
            .lock()
            .unwrap()
            .entry(from.id.clone())
            .or_insert_with(|| {
                Arc::new(FakeGhost {
                    intent: self.intent.clone(),
                    fail_update,
                    updates: AtomicUsize::new(0),
                    presence: Mutex::new(Vec::new()),
                })
            })
            .clone();
        Ok(ghost)
    }

    async fn find_remote_user(&self, user_id: &str) -> NetworkResult<Option<Arc<dyn GhostUser>>> {
        Ok(self
            .ghost(user_id)
            .map(|ghost| -> Arc<dyn GhostUser> { ghost }))
    }
}

/// `@alice:matrix.org` -> `alice`
pub struct FakeMangler;

impl NameMangler for FakeMangler {
    fn mangle_home_user_id(&self, user_id: &str) -> String {
        user_id
            .trim_start_matches('@')
            .split(':')
            .next()
            .unwrap_or(user_id)
            .to_string()
    }
}

/// Every fake wired together, with handles kept for assertions.
pub struct TestNetwork {
    pub identity: Arc<FakeIdentity>,
    pub client: Arc<FakeRemoteClient>,
    pub room: Arc<FakeRemoteRoom>,
    pub bot: Arc<FakeHomeSender>,
    pub ghosts: Arc<FakeHomeSender>,
    pub users: Arc<FakeUserMapper>,
    pub counters: Arc<CounterSet>,
}

impl TestNetwork {
    pub fn new() -> Self {
        let room = Arc::new(FakeRemoteRoom::default());
        let ghosts = Arc::new(FakeHomeSender::default());
        Self {
            identity: Arc::new(FakeIdentity {
                fail: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }),
            client: Arc::new(FakeRemoteClient {
                room: room.clone(),
                fail: AtomicBool::new(false),
                joined: Mutex::new(Vec::new()),
            }),
            room,
            bot: Arc::new(FakeHomeSender::default()),
            ghosts: ghosts.clone(),
            users: Arc::new(FakeUserMapper {
                intent: ghosts,
                ghosts: Mutex::new(HashMap::new()),
                fail_update: AtomicBool::new(false),
                fail_mapping: AtomicBool::new(false),
            }),
            counters: Arc::new(CounterSet::new()),
        }
    }

    pub fn services(&self) -> Services {
        Services {
            identity: self.identity.clone(),
            remote: self.client.clone(),
            bot: self.bot.clone(),
            users: self.users.clone(),
            mangler: Arc::new(FakeMangler),
            counters: self.counters.clone(),
        }
    }
}

pub fn remote_user(id: &str, username: &str) -> RemoteUser {
    RemoteUser {
        id: id.to_string(),
        username: username.to_string(),
        display_name: None,
    }
}

pub fn remote_message(from: &RemoteUser, text: &str, v: u32) -> RemoteMessage {
    RemoteMessage {
        from_user: Some(from.clone()),
        text: text.to_string(),
        html: text.to_string(),
        status: false,
        v,
    }
}

pub fn create_event(message: RemoteMessage) -> StreamEvent {
    StreamEvent {
        operation: Operation::Create,
        model: Some(message),
    }
}

pub fn update_event(message: RemoteMessage) -> StreamEvent {
    StreamEvent {
        operation: Operation::Update,
        model: Some(message),
    }
}

pub fn home_message(room_id: &str, user_id: &str, content: HomeMessageContent) -> HomeMessage {
    HomeMessage {
        room_id: room_id.to_string(),
        user_id: user_id.to_string(),
        content,
    }
}

/// Poll `condition` until it holds; panics after about two seconds.
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
