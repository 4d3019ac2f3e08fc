use crate::api::models::{CreatePostRequest, PostDto};
use crate::api::{ApiClient, ClientError};
use crate::db::models::Post;

impl ApiClient {
    /// `GET /post`
    pub async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        let posts: Vec<PostDto> = self.send(self.get("/post"), "list posts").await?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// `POST /post`
    pub async fn create_post(
        &self,
        access_token: Option<&str>,
        user_id: i64,
        image_url: &str,
        description: &str,
    ) -> Result<Post, ClientError> {
        let body = CreatePostRequest {
            user_id,
            url_image: image_url,
            description,
        };
        let post: PostDto = self
            .send(self.post("/post", access_token).json(&body), "create post")
            .await?;
        Ok(post.into())
    }
}
