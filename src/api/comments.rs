use crate::api::models::{AddCommentRequest, CommentDto};
use crate::api::{ApiClient, ClientError};
use crate::db::models::Comment;

impl ApiClient {
    /// `GET /comment?post_id=<id>`
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, ClientError> {
        let request = self.get("/comment").query(&[("post_id", post_id)]);
        let comments: Vec<CommentDto> = self.send(request, "list comments").await?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }

    /// `POST /comment`
    pub async fn add_comment(
        &self,
        access_token: Option<&str>,
        post_id: &str,
        text: &str,
        user_id: i64,
    ) -> Result<Comment, ClientError> {
        let body = AddCommentRequest {
            post_id,
            comment: text,
            user_id,
        };
        let comment: CommentDto = self
            .send(self.post("/comment", access_token).json(&body), "add comment")
            .await?;
        Ok(comment.into())
    }
}
