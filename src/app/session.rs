use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Which panel a session is currently showing. Exactly one view at a time;
/// the state persists across renders until an action changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewState {
    #[default]
    Idle,
    Content,
    News,
    Profile,
    Indices,
    Science,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub view: ViewState,
    /// Last payload produced by an input-driven view (content, profile,
    /// science), so re-rendering the same view shows it again.
    pub last_result: Option<Value>,
}

/// Session registry owned by the hosting surface. View state lives here and
/// is handed to the renderer explicitly; nothing reads it ambiently.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    pub fn create(&self) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            view: ViewState::default(),
            last_result: None,
        };
        self.sessions.insert(session.id, session.clone());
        session
    }

    pub fn get(&self, id: &Uuid) -> Option<Session> {
        self.sessions.get(id).map(|entry| entry.clone())
    }

    /// Transitions a session to `view`. Switching to a different view drops
    /// the previous view's stored result.
    pub fn set_view(&self, id: &Uuid, view: ViewState) -> Option<Session> {
        self.sessions.get_mut(id).map(|mut session| {
            if session.view != view {
                session.last_result = None;
            }
            session.view = view;
            session.clone()
        })
    }

    /// Drops a session entirely. Returns the removed session, or `None` if
    /// the id was unknown (or already removed).
    pub fn remove(&self, id: &Uuid) -> Option<Session> {
        self.sessions.remove(id).map(|(_, session)| session)
    }

    /// Stores the rendered payload of an input-driven action together with
    /// its view transition.
    pub fn record_result(&self, id: &Uuid, view: ViewState, result: Value) -> Option<Session> {
        self.sessions.get_mut(id).map(|mut session| {
            session.view = view;
            session.last_result = Some(result);
            session.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_session_starts_idle() {
        let store = SessionStore::new();
        let session = store.create();
        assert_eq!(session.view, ViewState::Idle);
        assert!(session.last_result.is_none());
    }

    #[test]
    fn test_view_persists_across_reads() {
        let store = SessionStore::new();
        let session = store.create();

        store.set_view(&session.id, ViewState::News).unwrap();
        assert_eq!(store.get(&session.id).unwrap().view, ViewState::News);
        // A second read still renders the same view.
        assert_eq!(store.get(&session.id).unwrap().view, ViewState::News);

        store.set_view(&session.id, ViewState::Indices).unwrap();
        assert_eq!(store.get(&session.id).unwrap().view, ViewState::Indices);
    }

    #[test]
    fn test_unknown_session_is_none() {
        let store = SessionStore::new();
        assert!(store.get(&Uuid::new_v4()).is_none());
        assert!(store.set_view(&Uuid::new_v4(), ViewState::News).is_none());
    }

    #[test]
    fn test_result_kept_for_same_view_dropped_on_switch() {
        let store = SessionStore::new();
        let session = store.create();

        store
            .record_result(&session.id, ViewState::Content, json!({"text": "hola"}))
            .unwrap();
        let session = store.get(&session.id).unwrap();
        assert_eq!(session.view, ViewState::Content);
        assert_eq!(session.last_result, Some(json!({"text": "hola"})));

        // Re-selecting the same view keeps the result.
        store.set_view(&session.id, ViewState::Content).unwrap();
        assert!(store.get(&session.id).unwrap().last_result.is_some());

        // Switching views drops it.
        store.set_view(&session.id, ViewState::News).unwrap();
        assert!(store.get(&session.id).unwrap().last_result.is_none());
    }

    #[test]
    fn test_removed_session_is_gone() {
        let store = SessionStore::new();
        let session = store.create();

        let removed = store.remove(&session.id).unwrap();
        assert_eq!(removed.id, session.id);
        assert!(store.get(&session.id).is_none());
        assert!(store.set_view(&session.id, ViewState::News).is_none());
        // A second removal finds nothing.
        assert!(store.remove(&session.id).is_none());
    }

    #[test]
    fn test_view_state_wire_names() {
        assert_eq!(serde_json::to_value(ViewState::Idle).unwrap(), json!("idle"));
        assert_eq!(
            serde_json::to_value(ViewState::Indices).unwrap(),
            json!("indices")
        );
        let parsed: ViewState = serde_json::from_value(json!("science")).unwrap();
        assert_eq!(parsed, ViewState::Science);
    }
}
