use colored::Colorize;
use serde::Serialize;
use serde_json::json;

use super::OutputFormat;
use crate::api::{Blog, BlogPage, MigrateShardResponse, ShardDistribution, ShardInfo, User};

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| json!({"status": "error", "error": e.to_string()}).to_string())
}

/// A backend acknowledgement with no payload worth showing
pub fn format_message(message: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&json!({"status": "success", "message": message})),
        OutputFormat::Text => message.to_string(),
    }
}

pub fn format_user(user: &User, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(user),
        OutputFormat::Text => format!(
            "{} {}\n  username: {}\n  email:    {}",
            user.name.bold(),
            format!("(#{})", user.id).dimmed(),
            user.username,
            user.email
        ),
    }
}

pub fn format_blog(blog: &Blog, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(blog),
        OutputFormat::Text => format!(
            "{} {}\n\n{}",
            blog.title.bold(),
            format!("(#{})", blog.id).dimmed(),
            blog.body
        ),
    }
}

/// One line per post: id, title and the start of the body
pub fn format_blog_page(page: &BlogPage, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(page);
    }
    if page.blogs.is_empty() {
        return "No blogs found.".dimmed().to_string();
    }

    let mut out = String::new();
    for blog in &page.blogs {
        out.push_str(&format!(
            "{:>6}  {}  {}\n",
            format!("#{}", blog.id).cyan(),
            blog.title.bold(),
            preview(&blog.body, 60).dimmed()
        ));
    }
    out.push_str(&format!(
        "page {} · {} per page · {} total",
        page.pagination.page, page.pagination.limit, page.pagination.total
    ));
    out
}

fn preview(body: &str, max_chars: usize) -> String {
    let flat: String = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

pub fn format_shards(shards: &[ShardInfo], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(shards);
    }
    if shards.is_empty() {
        return "No shards reported.".dimmed().to_string();
    }

    let mut out = format!(
        "{:<16} {:<10} {:>8} {:>8}  {}\n",
        "NAME", "STATUS", "USERS", "BLOGS", "ADDRESS"
    );
    for shard in shards {
        let status = if shard.status.eq_ignore_ascii_case("healthy") || shard.status.eq_ignore_ascii_case("online") {
            shard.status.green()
        } else {
            shard.status.yellow()
        };
        out.push_str(&format!(
            "{:<16} {:<10} {:>8} {:>8}  {}:{}\n",
            shard.name, status, shard.user_count, shard.blog_count, shard.host, shard.port
        ));
    }
    out.trim_end().to_string()
}

pub fn format_distribution(distribution: &ShardDistribution, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(distribution);
    }
    if distribution.is_empty() {
        return "No distribution data.".dimmed().to_string();
    }

    let widest = distribution
        .values()
        .map(|c| c.user_count.max(c.blog_count))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (name, counts) in distribution {
        out.push_str(&format!(
            "{}\n  users {:>6} {}\n  blogs {:>6} {}\n",
            name.bold(),
            counts.user_count,
            bar(counts.user_count, widest).blue(),
            counts.blog_count,
            bar(counts.blog_count, widest).green()
        ));
    }
    out.trim_end().to_string()
}

/// Text stand-in for the dashboard's bar chart, scaled to 30 columns
fn bar(value: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let width = (u128::from(value) * 30).div_ceil(u128::from(max)) as usize;
    "█".repeat(width)
}

pub fn format_migration(result: &MigrateShardResponse, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(result);
    }
    let detail = result
        .message
        .as_deref()
        .or(result.error.as_deref())
        .or(result.status.as_deref())
        .unwrap_or("");
    if result.succeeded() {
        format!("Migration result: {}", detail.green())
    } else {
        format!("Migration result: {}", detail.red())
    }
}
