#![allow(dead_code)]

use optimo::{
    CoordinatorConfig, GatewayConfig, ItemId, Notification, NotificationCenter, NotificationKind,
    OptimisticCoordinator, Record, SimulatedGateway,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bookmark {
    pub id: u64,
    pub title: String,
    pub status: String,
    pub revision: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub status: Option<String>,
}

impl BookmarkPatch {
    pub fn status(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            ..Self::default()
        }
    }

    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }
}

impl Record for Bookmark {
    type Change = BookmarkPatch;

    fn id(&self) -> ItemId {
        ItemId::from(self.id)
    }

    fn apply(&mut self, change: &BookmarkPatch) {
        if let Some(title) = &change.title {
            self.title = title.clone();
        }
        if let Some(status) = &change.status {
            self.status = status.clone();
        }
    }

    fn validate(change: &BookmarkPatch) -> Result<(), String> {
        if change.title.is_none() && change.status.is_none() {
            return Err("change is empty".to_string());
        }
        if matches!(&change.title, Some(title) if title.trim().is_empty()) {
            return Err("title must not be empty".to_string());
        }
        Ok(())
    }
}

pub fn bookmark(id: u64, status: &str) -> Bookmark {
    Bookmark {
        id,
        title: format!("bookmark {id}"),
        status: status.to_string(),
        revision: 0,
    }
}

pub fn library() -> Vec<Bookmark> {
    vec![
        bookmark(1, "present"),
        bookmark(2, "absent"),
        bookmark(3, "present"),
    ]
}

pub struct Fixture {
    pub gateway: Arc<SimulatedGateway<Bookmark>>,
    pub center: Arc<NotificationCenter>,
    pub coordinator: OptimisticCoordinator<Bookmark>,
}

impl Fixture {
    pub fn new(records: Vec<Bookmark>) -> Self {
        Self::with_config(records, CoordinatorConfig::new())
    }

    /// The gateway bumps `revision` on every write, so confirmed values
    /// always differ from the optimistic ones.
    pub fn with_config(records: Vec<Bookmark>, config: CoordinatorConfig) -> Self {
        let gateway = Arc::new(
            SimulatedGateway::with_config(records, GatewayConfig::new())
                .with_stamp(|bookmark: &mut Bookmark| bookmark.revision += 1),
        );
        let center = Arc::new(NotificationCenter::new());
        let coordinator: OptimisticCoordinator<Bookmark> = OptimisticCoordinator::with_config(
            gateway.clone(),
            center.clone(),
            config.labels("bookmark", "bookmarks"),
        );

        Self {
            gateway,
            center,
            coordinator,
        }
    }

    /// Fixture whose collection is already fetched, with notifications cleared.
    pub async fn loaded(records: Vec<Bookmark>) -> Self {
        Self::loaded_with_config(records, CoordinatorConfig::new()).await
    }

    pub async fn loaded_with_config(records: Vec<Bookmark>, config: CoordinatorConfig) -> Self {
        let fixture = Self::with_config(records, config);
        fixture
            .coordinator
            .fetch_all()
            .await
            .expect("initial fetch");
        fixture.center.clear();
        fixture
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.gateway.set_delay(delay);
        self
    }

    pub fn notifications_of(&self, kind: NotificationKind) -> Vec<Notification> {
        self.center
            .all()
            .into_iter()
            .filter(|notification| notification.kind == kind)
            .collect()
    }

    pub fn persistent_errors(&self) -> Vec<Notification> {
        self.notifications_of(NotificationKind::Error)
            .into_iter()
            .filter(|notification| notification.persistent)
            .collect()
    }
}
