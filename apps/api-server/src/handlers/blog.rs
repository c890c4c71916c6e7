//! Blog endpoints.

use actix_multipart::form::{MultipartForm, MultipartFormConfig, tempfile::TempFile, text::Text};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use uuid::Uuid;

use quill_core::domain::{Blog, BlogDraft, BlogView, Category};
use quill_core::error::DomainError;
use quill_core::ports::ImageUpload;
use quill_shared::dto::{BlogMetadata, MessageResponse, SearchParams};
use quill_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart body of the create and update endpoints.
#[derive(MultipartForm)]
pub struct BlogForm {
    /// JSON-encoded [`BlogMetadata`].
    pub data: Option<Text<String>>,
    pub file: Option<TempFile>,
}

#[derive(Debug, Serialize)]
pub struct BlogsPayload {
    pub blogs: Vec<BlogView>,
}

#[derive(Debug, Serialize)]
pub struct BlogPayload {
    pub blog: Option<BlogView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPayload {
    pub related_blogs: Vec<Blog>,
}

#[derive(Debug, Serialize)]
pub struct CategoryBlogsPayload {
    pub blogs: Vec<BlogView>,
    pub category: Category,
}

/// Multipart limits, with extraction failures rendered as the error envelope.
pub fn multipart_config(total_limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(total_limit)
        .error_handler(|err, _req: &HttpRequest| {
            tracing::debug!(error = %err, "Rejected multipart body");
            AppError::BadRequest("Data not found".to_string()).into()
        })
}

/// Create a blog post.
///
/// POST /api/blogs
pub async fn create_blog(
    state: web::Data<AppState>,
    identity: Identity,
    MultipartForm(form): MultipartForm<BlogForm>,
) -> AppResult<HttpResponse> {
    let (meta, image) = read_form(form).await?;
    let draft = BlogDraft {
        author: meta.author.unwrap_or(identity.user_id),
        category: meta.category,
        title: meta.title,
        slug: meta.slug,
        content: meta.blog_content,
    };

    let blog = state.blogs.create(&identity.actor(), draft, image).await?;
    tracing::info!(blog_id = %blog.id, slug = %blog.slug, "Blog created");

    Ok(message("Blog added successfully."))
}

/// Blogs visible to the caller: all of them for admins, their own otherwise.
///
/// GET /api/blogs
pub async fn list_blogs(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let blogs = state.blogs.list_for(&identity.actor()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(BlogsPayload { blogs })))
}

/// GET /api/blogs/public
pub async fn list_public(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let blogs = state.blogs.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(BlogsPayload { blogs })))
}

/// Delete a blog post. Unknown ids still answer success.
///
/// DELETE /api/blogs/{blogid}
pub async fn delete_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.blogs.delete(&identity.actor(), id).await?;
    tracing::info!(blog_id = %id, "Blog deleted");

    Ok(message("Blog Deleted successfully."))
}

/// GET /api/blogs/{blogid}/edit
pub async fn edit_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog = state
        .blogs
        .fetch_for_edit(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(BlogPayload { blog: Some(blog) })))
}

/// Update a blog post, optionally replacing its featured image.
///
/// PUT /api/blogs/{blogid}
pub async fn update_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    MultipartForm(form): MultipartForm<BlogForm>,
) -> AppResult<HttpResponse> {
    let (meta, image) = read_form(form).await?;
    let draft = BlogDraft {
        author: identity.user_id,
        category: meta.category,
        title: meta.title,
        slug: meta.slug,
        content: meta.blog_content,
    };

    let blog = state
        .blogs
        .update(&identity.actor(), path.into_inner(), draft, image)
        .await?;
    tracing::info!(blog_id = %blog.id, "Blog updated");

    Ok(message("Blog updated successfully."))
}

/// One blog by slug; `blog` is null when nothing matches.
///
/// GET /api/blogs/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let blog = state.blogs.get_by_slug(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(BlogPayload { blog })))
}

/// GET /api/blogs/related/{category}/{slug}
pub async fn related_blogs(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (category, slug) = path.into_inner();
    let related_blogs = state
        .blogs
        .related(&category, &slug)
        .await
        .map_err(|e| category_not_found(e, "Data not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(RelatedPayload { related_blogs })))
}

/// GET /api/blogs/category/{category}
pub async fn by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let (category, blogs) = state
        .blogs
        .by_category(&path.into_inner())
        .await
        .map_err(|e| category_not_found(e, "Category data not found."))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoryBlogsPayload { blogs, category })))
}

/// GET /api/blogs/search?q=
pub async fn search_blogs(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let blogs = state.blogs.search(&query.q).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(BlogsPayload { blogs })))
}

fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(MessageResponse::new(text)))
}

fn category_not_found(err: DomainError, detail: &str) -> AppError {
    match err {
        DomainError::NotFound { .. } => AppError::NotFound(detail.to_string()),
        other => other.into(),
    }
}

/// Split the form into parsed metadata and the attached file, if any.
/// An empty file part counts as no file.
async fn read_form(form: BlogForm) -> AppResult<(BlogMetadata, Option<ImageUpload>)> {
    let meta = form
        .data
        .and_then(|data| serde_json::from_str::<BlogMetadata>(&data.into_inner()).ok())
        .ok_or_else(|| AppError::BadRequest("Data not found".to_string()))?;

    let image = match form.file {
        Some(file) if file.size > 0 => Some(read_upload(file).await?),
        _ => None,
    };

    Ok((meta, image))
}

async fn read_upload(file: TempFile) -> AppResult<ImageUpload> {
    let bytes = tokio::fs::read(file.file.path())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read uploaded file: {}", e)))?;

    Ok(ImageUpload {
        file_name: file.file_name.unwrap_or_else(|| "upload".to_string()),
        content_type: file.content_type.map(|mime| mime.to_string()),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;

    use quill_core::BlogService;
    use quill_core::domain::{Role, User};
    use quill_core::ports::{BaseRepository, BlogRepository, TokenService};
    use quill_infra::{
        DisabledImageHost, InMemoryBlogRepository, InMemoryCategoryRepository,
        InMemoryUserRepository, JwtConfig, JwtTokenService,
    };

    use super::*;
    use crate::handlers::configure_routes;
    use crate::state::Storage;

    const BOUNDARY: &str = "quill-test-boundary";

    struct Harness {
        state: AppState,
        tokens: Arc<dyn TokenService>,
        blogs: Arc<InMemoryBlogRepository>,
        admin: User,
        alice: User,
        bob: User,
        pets: Category,
    }

    impl Harness {
        async fn new() -> Self {
            let blogs = Arc::new(InMemoryBlogRepository::new());
            let categories = Arc::new(InMemoryCategoryRepository::new());
            let users = Arc::new(InMemoryUserRepository::new());

            let admin = users
                .insert(User::new("Root".into(), "root@example.com".into(), Role::Admin))
                .await
                .unwrap();
            let alice = users
                .insert(User::new("Alice".into(), "alice@example.com".into(), Role::User))
                .await
                .unwrap();
            let bob = users
                .insert(User::new("Bob".into(), "bob@example.com".into(), Role::User))
                .await
                .unwrap();
            let pets = categories
                .insert(Category::new("Pets".into(), "pets".into()))
                .await
                .unwrap();

            let service = BlogService::new(
                blogs.clone(),
                categories,
                users,
                Arc::new(DisabledImageHost),
            );
            let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
                secret: "handler-test-secret".to_string(),
                ..JwtConfig::default()
            }));

            Self {
                state: AppState::from_service(service, Storage::Memory),
                tokens,
                blogs,
                admin,
                alice,
                bob,
                pets,
            }
        }

        fn bearer(&self, user: &User) -> (&'static str, String) {
            let token = self.tokens.generate_token(user.id, user.role).unwrap();
            ("Authorization", format!("Bearer {}", token))
        }

        async fn seed(&self, author: &User, title: &str, slug: &str) -> Blog {
            let blog = Blog::new(
                BlogDraft {
                    author: author.id,
                    category: self.pets.id,
                    title: title.to_string(),
                    slug: slug.to_string(),
                    content: "<p>body</p>".to_string(),
                },
                String::new(),
            );
            self.blogs.insert(blog).await.unwrap()
        }
    }

    macro_rules! app {
        ($h:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($h.state.clone()))
                    .app_data(web::Data::new($h.tokens.clone()))
                    .app_data(multipart_config(1024 * 1024))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn multipart(data: &str, file: Option<&[u8]>) -> (String, Vec<u8>) {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{data}\r\n"
        )
        .into_bytes();
        if let Some(bytes) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cover.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), body)
    }

    fn metadata(category: Uuid, title: &str, slug: &str) -> String {
        serde_json::json!({
            "category": category,
            "title": title,
            "slug": slug,
            "blogContent": "<p>hello</p>",
        })
        .to_string()
    }

    #[actix_web::test]
    async fn test_list_requires_token() {
        let h = Harness::new().await;
        let app = app!(h);

        let req = test::TestRequest::get().uri("/api/blogs").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["status"], 401);
    }

    #[actix_web::test]
    async fn test_list_is_scoped_by_role() {
        let h = Harness::new().await;
        h.seed(&h.alice, "Alice one", "alice-one").await;
        h.seed(&h.bob, "Bob one", "bob-one").await;
        let app = app!(h);

        let req = test::TestRequest::get()
            .uri("/api/blogs")
            .insert_header(h.bearer(&h.alice))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let blogs = body["data"]["blogs"].as_array().unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0]["slug"], "alice-one");
        assert_eq!(blogs[0]["author"]["name"], "Alice");

        let req = test::TestRequest::get()
            .uri("/api/blogs")
            .insert_header(h.bearer(&h.admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["blogs"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_public_list_needs_no_token() {
        let h = Harness::new().await;
        h.seed(&h.alice, "First", "first").await;
        let app = app!(h);

        let req = test::TestRequest::get().uri("/api/blogs/public").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["ok"], true);
        assert_eq!(body["data"]["blogs"][0]["category"]["slug"], "pets");
    }

    #[actix_web::test]
    async fn test_unknown_slug_returns_null_blog() {
        let h = Harness::new().await;
        let app = app!(h);

        let req = test::TestRequest::get()
            .uri("/api/blogs/slug/nope")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["data"]["blog"].is_null());
    }

    #[actix_web::test]
    async fn test_search_is_case_insensitive() {
        let h = Harness::new().await;
        h.seed(&h.alice, "Cats 101", "cats-101").await;
        h.seed(&h.alice, "CATEGORY", "category").await;
        h.seed(&h.alice, "Dogs", "dogs").await;
        let app = app!(h);

        let req = test::TestRequest::get()
            .uri("/api/blogs/search?q=cat")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["blogs"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_related_excludes_current_slug() {
        let h = Harness::new().await;
        h.seed(&h.alice, "One", "one").await;
        h.seed(&h.alice, "Two", "two").await;
        h.seed(&h.bob, "Three", "three").await;
        let app = app!(h);

        let req = test::TestRequest::get()
            .uri("/api/blogs/related/pets/two")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let related = body["data"]["relatedBlogs"].as_array().unwrap();

        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|b| b["slug"] != "two"));
    }

    #[actix_web::test]
    async fn test_related_unknown_category_is_404() {
        let h = Harness::new().await;
        let app = app!(h);

        let req = test::TestRequest::get()
            .uri("/api/blogs/related/nope/x")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["detail"], "Data not found");
    }

    #[actix_web::test]
    async fn test_by_category_includes_category() {
        let h = Harness::new().await;
        h.seed(&h.alice, "One", "one").await;
        let app = app!(h);

        let req = test::TestRequest::get()
            .uri("/api/blogs/category/pets")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["category"]["name"], "Pets");
        assert_eq!(body["data"]["blogs"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_delete_unknown_id_succeeds() {
        let h = Harness::new().await;
        let app = app!(h);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/blogs/{}", Uuid::new_v4()))
            .insert_header(h.bearer(&h.alice))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["message"], "Blog Deleted successfully.");
    }

    #[actix_web::test]
    async fn test_delete_by_other_user_is_forbidden() {
        let h = Harness::new().await;
        let blog = h.seed(&h.alice, "Mine", "mine").await;
        let app = app!(h);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/blogs/{}", blog.id))
            .insert_header(h.bearer(&h.bob))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(h.blogs.find_by_id(blog.id).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_edit_missing_blog_is_404() {
        let h = Harness::new().await;
        let app = app!(h);

        let req = test::TestRequest::get()
            .uri(&format!("/api/blogs/{}/edit", Uuid::new_v4()))
            .insert_header(h.bearer(&h.admin))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_create_without_file() {
        let h = Harness::new().await;
        let app = app!(h);
        let (content_type, body) = multipart(&metadata(h.pets.id, "Hello", "hello"), None);

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(h.bearer(&h.alice))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["message"], "Blog added successfully.");

        let req = test::TestRequest::get()
            .uri("/api/blogs/slug/hello")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let blog = &body["data"]["blog"];
        assert_eq!(blog["featuredImage"], "");
        assert_eq!(blog["blogContent"], "&lt;p&gt;hello&lt;/p&gt;");
        assert_eq!(blog["author"]["id"], h.alice.id.to_string());
    }

    #[actix_web::test]
    async fn test_create_with_failed_upload_persists_nothing() {
        let h = Harness::new().await;
        let app = app!(h);
        let (content_type, body) =
            multipart(&metadata(h.pets.id, "Hello", "hello"), Some(b"not-a-png"));

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(h.bearer(&h.alice))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["detail"], "Image upload failed");
        assert!(h.blogs.find_by_slug("hello").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_create_with_bad_metadata_is_400() {
        let h = Harness::new().await;
        let app = app!(h);
        let (content_type, body) = multipart("{not json", None);

        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(h.bearer(&h.alice))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["detail"], "Data not found");
    }

    #[actix_web::test]
    async fn test_update_rewrites_fields() {
        let h = Harness::new().await;
        let blog = h.seed(&h.alice, "Old", "old").await;
        let app = app!(h);
        let (content_type, body) = multipart(&metadata(h.pets.id, "New", "new"), None);

        let req = test::TestRequest::put()
            .uri(&format!("/api/blogs/{}", blog.id))
            .insert_header(h.bearer(&h.alice))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["message"], "Blog updated successfully.");

        let stored = h.blogs.find_by_id(blog.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "New");
        assert_eq!(stored.slug, "new");
        assert_eq!(stored.author, h.alice.id);
    }
}
