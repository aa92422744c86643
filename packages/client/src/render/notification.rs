//! Toast notifications and the unread badge.

use std::{fmt, sync::Arc, time::Duration};

use hubsync_shared::time::Clock;
use uuid::Uuid;

use crate::domain::{Notification, NotificationKind};

use super::{ViewSink, ViewUpdate};

pub const DEFAULT_TOAST_TTL_MS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Info,
}

/// One on-screen notification element
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub body: String,
    pub variant: ToastVariant,
    pub expires_at_ms: i64,
}

impl Toast {
    /// Toast for `notification`, titled by its kind
    pub fn from_notification(notification: &Notification, expires_at_ms: i64) -> Self {
        let (title, variant) = match notification.kind {
            NotificationKind::Order => ("New Order!", ToastVariant::Success),
            _ => ("Notification", ToastVariant::Info),
        };

        Self {
            id: ToastId::generate(),
            title: title.to_string(),
            body: notification.message.clone(),
            variant,
            expires_at_ms,
        }
    }
}

/// Renders every notification as its own short-lived toast.
///
/// There is no suppression or batching: N calls to `render` produce N toasts.
pub struct NotificationRenderer {
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
    toasts: Vec<Toast>,
    unread: usize,
    view: ViewSink,
}

impl NotificationRenderer {
    pub fn new(clock: Arc<dyn Clock>, ttl_ms: i64, view: ViewSink) -> Self {
        Self {
            clock,
            ttl_ms,
            toasts: Vec::new(),
            unread: 0,
            view,
        }
    }

    /// Show one toast for `notification`
    pub fn render(&mut self, notification: &Notification) -> ToastId {
        let expires_at_ms = self.clock.now_millis() + self.ttl_ms;
        let toast = Toast::from_notification(notification, expires_at_ms);
        let id = toast.id;

        tracing::debug!("Showing toast {} ({})", id, notification.kind.as_str());
        self.toasts.push(toast.clone());
        self.view.paint(ViewUpdate::ToastShown(toast));
        id
    }

    /// Remove a toast on user request; `false` if it is already gone
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        let removed = self.toasts.len() != before;
        if removed {
            self.view.paint(ViewUpdate::ToastRemoved(id));
        }
        removed
    }

    /// Remove every toast whose lifetime has elapsed; returns how many
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_millis();
        let (expired, alive): (Vec<Toast>, Vec<Toast>) = self
            .toasts
            .drain(..)
            .partition(|toast| toast.expires_at_ms <= now);
        self.toasts = alive;

        for toast in &expired {
            self.view.paint(ViewUpdate::ToastRemoved(toast.id));
        }
        expired.len()
    }

    /// Time left until the earliest toast expires; `None` when no toast is shown
    pub fn next_expiry_in(&self) -> Option<Duration> {
        let now = self.clock.now_millis();
        self.toasts
            .iter()
            .map(|toast| toast.expires_at_ms)
            .min()
            .map(|at| Duration::from_millis(u64::try_from(at.saturating_sub(now)).unwrap_or(0)))
    }

    /// Set the badge to the size of the latest poll response
    pub fn set_unread(&mut self, count: usize) {
        self.unread = count;
        self.view.paint(ViewUpdate::BadgeChanged { count });
    }

    pub fn unread(&self) -> usize {
        self.unread
    }

    pub fn badge_visible(&self) -> bool {
        self.unread > 0
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Remove all toasts without waiting for them to expire
    pub fn clear(&mut self) {
        for toast in self.toasts.drain(..) {
            self.view.paint(ViewUpdate::ToastRemoved(toast.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubsync_shared::time::ManualClock;

    fn create_test_renderer() -> (NotificationRenderer, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let renderer = NotificationRenderer::new(
            Arc::new(clock.clone()),
            DEFAULT_TOAST_TTL_MS,
            ViewSink::detached(),
        );
        (renderer, clock)
    }

    #[test]
    fn test_render_order_notification() {
        // テスト項目: order 通知は "New Order!" タイトルの success トーストになる
        // given (前提条件):
        let (mut renderer, _clock) = create_test_renderer();
        let notification = Notification::new("Order #5 placed", NotificationKind::Order);

        // when (操作):
        renderer.render(&notification);

        // then (期待する結果):
        assert_eq!(renderer.toasts().len(), 1);
        let toast = &renderer.toasts()[0];
        assert_eq!(toast.title, "New Order!");
        assert!(toast.body.contains("Order #5 placed"));
        assert_eq!(toast.variant, ToastVariant::Success);
    }

    #[test]
    fn test_render_other_kinds_use_generic_title() {
        // テスト項目: order 以外の通知は "Notification" タイトルの info トーストになる
        // given (前提条件):
        let (mut renderer, _clock) = create_test_renderer();

        // when (操作):
        renderer.render(&Notification::new("hi", NotificationKind::Activity));

        // then (期待する結果):
        let toast = &renderer.toasts()[0];
        assert_eq!(toast.title, "Notification");
        assert_eq!(toast.variant, ToastVariant::Info);
    }

    #[test]
    fn test_toast_expires_after_ttl() {
        // テスト項目: トーストは 5 秒経過後に消える
        // given (前提条件):
        let (mut renderer, clock) = create_test_renderer();
        renderer.render(&Notification::new("hello", NotificationKind::Info));

        // when (操作):
        clock.advance(4_999);
        let early = renderer.sweep_expired();
        clock.advance(1);
        let on_time = renderer.sweep_expired();

        // then (期待する結果):
        assert_eq!(early, 0);
        assert_eq!(on_time, 1);
        assert!(renderer.toasts().is_empty());
    }

    #[test]
    fn test_next_expiry_tracks_earliest_toast() {
        // テスト項目: 次の期限は最も古いトーストの残り時間になり、期限切れ後は 0 になる
        // given (前提条件):
        let (mut renderer, clock) = create_test_renderer();
        let empty = renderer.next_expiry_in();
        renderer.render(&Notification::new("first", NotificationKind::Info));
        clock.advance(2_000);
        renderer.render(&Notification::new("second", NotificationKind::Info));

        // when (操作):
        let pending = renderer.next_expiry_in();
        clock.advance(4_000);
        let overdue = renderer.next_expiry_in();

        // then (期待する結果):
        assert_eq!(empty, None);
        assert_eq!(pending, Some(Duration::from_millis(3_000)));
        assert_eq!(overdue, Some(Duration::ZERO));
    }

    #[test]
    fn test_dismiss_before_expiry() {
        // テスト項目: 手動で閉じたトーストは期限前に消え、期限時に二重削除されない
        // given (前提条件):
        let (mut renderer, clock) = create_test_renderer();
        let id = renderer.render(&Notification::new("hello", NotificationKind::Info));

        // when (操作):
        let dismissed = renderer.dismiss(id);
        clock.advance(DEFAULT_TOAST_TTL_MS);
        let swept = renderer.sweep_expired();

        // then (期待する結果):
        assert!(dismissed);
        assert_eq!(swept, 0);
        assert!(!renderer.dismiss(id));
    }

    #[test]
    fn test_rapid_renders_are_not_batched() {
        // テスト項目: 連続した通知はそれぞれ別のトーストとして表示される
        // given (前提条件):
        let (mut renderer, _clock) = create_test_renderer();
        let notification = Notification::new("same", NotificationKind::Info);

        // when (操作):
        for _ in 0..3 {
            renderer.render(&notification);
        }

        // then (期待する結果):
        assert_eq!(renderer.toasts().len(), 3);
    }

    #[test]
    fn test_unread_badge_follows_latest_count() {
        // テスト項目: バッジは最新のポーリング結果の件数を表示し、0 件で非表示になる
        // given (前提条件):
        let (mut renderer, _clock) = create_test_renderer();

        // when (操作):
        renderer.set_unread(2);
        let visible = renderer.badge_visible();
        renderer.set_unread(0);

        // then (期待する結果):
        assert!(visible);
        assert_eq!(renderer.unread(), 0);
        assert!(!renderer.badge_visible());
    }

    #[test]
    fn test_render_paints_update() {
        // テスト項目: トースト表示時に ToastShown が通知される
        // given (前提条件):
        let (view, mut rx) = ViewSink::channel();
        let mut renderer =
            NotificationRenderer::new(Arc::new(ManualClock::new(0)), DEFAULT_TOAST_TTL_MS, view);

        // when (操作):
        let id = renderer.render(&Notification::new("hello", NotificationKind::Info));

        // then (期待する結果):
        match rx.try_recv() {
            Ok(ViewUpdate::ToastShown(toast)) => {
                assert_eq!(toast.id, id);
                assert_eq!(toast.expires_at_ms, DEFAULT_TOAST_TTL_MS);
            }
            other => panic!("unexpected update: {:?}", other),
        }
    }
}
