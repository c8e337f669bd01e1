use foundation::escape_html;
use providers::{LeaderboardRow, Post};

use crate::messages::NO_POSTS;

/// Class of the upvote button in each post; the page delegates its clicks.
pub const UPVOTE_BUTTON_CLASS: &str = "upvote-btn";
/// Attribute on the upvote button carrying the post id.
pub const POST_ID_ATTR: &str = "data-post-id";

/// Medal for the top three, 1-based rank after that.
pub fn rank_label(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => (n + 1).to_string(),
    }
}

pub fn render_posts(posts: &[Post]) -> String {
    if posts.is_empty() {
        return NO_POSTS.to_string();
    }
    posts.iter().map(render_post).collect()
}

fn render_post(post: &Post) -> String {
    format!(
        r#"<div class="post-item">
<div class="post-header"><div class="post-title">{title}</div><span class="post-type-badge">{kind}</span></div>
<p>{content}</p>
<div class="post-meta">📍 {location} | 👤 {username} | {date}</div>
<button class="{button}" {attr}="{id}">👍 Upvote ({upvotes})</button>
</div>"#,
        title = escape_html(&post.title),
        kind = post.post_type.as_str().replace('_', " "),
        content = escape_html(&post.content),
        location = escape_html(&post.location),
        username = escape_html(&post.username),
        date = post.created_at.format("%-m/%-d/%Y"),
        button = UPVOTE_BUTTON_CLASS,
        attr = POST_ID_ATTR,
        id = escape_html(&post.id),
        upvotes = post.upvotes,
    )
}

pub fn render_leaderboard(rows: &[LeaderboardRow]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            format!(
                r#"<div class="leaderboard-item">
<span class="rank">{rank}</span>
<div class="user-info"><strong>{username}</strong><br><small>{points} points | {co2} kg CO₂ saved</small></div>
<div class="user-stats"><div>Green Score: {score}</div><small>{streak} day streak</small></div>
</div>"#,
                rank = rank_label(i),
                username = escape_html(&row.username),
                points = row.eco_points,
                co2 = row.co2_saved,
                score = row.green_score,
                streak = row.streak_days,
            )
        })
        .collect()
}
