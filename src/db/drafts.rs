//! Posts and comments kept in the client database when creates are configured
//! to stay local.

use rusqlite::params;

use crate::db::models::{Comment, Post};
use crate::error::AppResult;
use crate::state::DbPool;

pub fn insert_post(
    pool: &DbPool,
    author_id: &str,
    image_url: &str,
    description: &str,
) -> AppResult<Post> {
    let id = uuid::Uuid::now_v7().to_string();
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO local_posts (id, author_id, image_url, description) VALUES (?1, ?2, ?3, ?4)",
        params![id, author_id, image_url, description],
    )?;
    let created_at: String = conn.query_row(
        "SELECT created_at FROM local_posts WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;

    Ok(Post {
        id,
        author_id: author_id.to_string(),
        image_url: image_url.to_string(),
        description: Some(description.to_string()),
        created_at: Some(created_at),
        local: true,
    })
}

/// Newest first.
pub fn list_posts(pool: &DbPool) -> AppResult<Vec<Post>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, author_id, image_url, description, created_at
         FROM local_posts
         ORDER BY created_at DESC, id DESC",
    )?;

    let posts = stmt
        .query_map([], |row| {
            Ok(Post {
                id: row.get(0)?,
                author_id: row.get(1)?,
                image_url: row.get(2)?,
                description: Some(row.get(3)?),
                created_at: Some(row.get(4)?),
                local: true,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(posts)
}

pub fn post_exists(pool: &DbPool, id: &str) -> AppResult<bool> {
    let conn = pool.get()?;
    let exists = conn.query_row(
        "SELECT COUNT(*) > 0 FROM local_posts WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn insert_comment(
    pool: &DbPool,
    post_id: &str,
    author_id: &str,
    body: &str,
) -> AppResult<Comment> {
    let id = uuid::Uuid::now_v7().to_string();
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO local_comments (id, post_id, author_id, body) VALUES (?1, ?2, ?3, ?4)",
        params![id, post_id, author_id, body],
    )?;
    let created_at: String = conn.query_row(
        "SELECT created_at FROM local_comments WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;

    Ok(Comment {
        id,
        post_id: post_id.to_string(),
        author_id: author_id.to_string(),
        text: body.to_string(),
        created_at: Some(created_at),
    })
}

/// Oldest first, matching the order comments are appended in.
pub fn list_comments(pool: &DbPool, post_id: &str) -> AppResult<Vec<Comment>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, post_id, author_id, body, created_at
         FROM local_comments
         WHERE post_id = ?1
         ORDER BY created_at ASC, id ASC",
    )?;

    let comments = stmt
        .query_map(params![post_id], |row| {
            Ok(Comment {
                id: row.get(0)?,
                post_id: row.get(1)?,
                author_id: row.get(2)?,
                text: row.get(3)?,
                created_at: Some(row.get(4)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(comments)
}
