//! Plain-text rendering of resource responses and the toast layer.

use catalog_bridge::envelope::ResponseEnvelope;
use catalog_bridge::models::{Category, Product};
use catalog_bridge::ResourceResponse;
use tokio::sync::watch;

use crate::formatting::{format_pagination, format_price, format_stock, truncate_description};
use crate::notifications::{Notification, NotificationId};

pub fn product_line(product: &Product) -> String {
    let mut line = format!(
        "{}  {}  {}  {}  {}  [{}]",
        product.id,
        product.sku,
        product.name,
        format_price(product.price),
        format_stock(product.stock),
        product.category_id.label(),
    );
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str("  ");
        line.push_str(&truncate_description(description));
    }
    line
}

pub fn category_line(category: &Category) -> String {
    let mut line = format!("{}  {}  /{}", category.id, category.name, category.slug);
    if let Some(description) = category.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str("  ");
        line.push_str(&truncate_description(description));
    }
    line
}

/// Renders any resource response, one record per line, followed by the
/// pagination summary when the service sent one.
pub fn render_response<T>(response: &ResourceResponse<T>, line: impl Fn(&T) -> String) -> Vec<String> {
    match response {
        ResourceResponse::Many(envelope) => render_list(envelope, line),
        ResourceResponse::One(envelope) => vec![line(&envelope.data)],
    }
}

fn render_list<T>(envelope: &ResponseEnvelope<Vec<T>>, line: impl Fn(&T) -> String) -> Vec<String> {
    let mut lines: Vec<String> = envelope.data.iter().map(line).collect();
    if envelope.data.is_empty() {
        lines.push("no records".to_string());
    }
    if let Some(pagination) = &envelope.pagination {
        lines.push(format_pagination(pagination, envelope.data.len()));
    }
    lines
}

pub fn notification_line(notification: &Notification) -> String {
    format!(
        "[{}] {}",
        notification.notification_type.label().to_uppercase(),
        notification.message
    )
}

/// Prints each notification once, when it first becomes visible. Runs until
/// the queue is dropped.
pub async fn render_toasts(mut changes: watch::Receiver<Vec<Notification>>) {
    let mut last_shown: Option<NotificationId> = None;
    while changes.changed().await.is_ok() {
        let visible = changes.borrow_and_update().clone();
        for line in newly_visible(&visible, &mut last_shown) {
            eprintln!("{line}");
        }
    }
}

/// Lines for notifications added since `last_shown`. Ids grow with every
/// addition, so anything above the last shown id is new.
fn newly_visible(visible: &[Notification], last_shown: &mut Option<NotificationId>) -> Vec<String> {
    let fresh: Vec<&Notification> = visible
        .iter()
        .filter(|notification| last_shown.is_none_or(|shown| notification.id > shown))
        .collect();
    if let Some(newest) = fresh.iter().map(|notification| notification.id).max() {
        *last_shown = Some(newest);
    }
    fresh.into_iter().map(notification_line).collect()
}
