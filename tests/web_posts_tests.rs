
use reqwest::{header, multipart::Form, StatusCode};
use test_utils::*;

fn location(response: &reqwest::Response) -> String {
    response.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn sets_cookie(response: &reqwest::Response, name: &str) -> bool {
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&format!("{}=", name)))
}

#[actix_rt::test]
async fn index_lists_posts() {
    let app = TestApp::spawn().await;
    let titles = ["Some title", "Another post title", "Third post & more"];
    for title in titles {
        app.seed_post(title, "Description").await;
    }

    let response = app.client.get(app.url("/posts")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Some title"));
    assert!(html.contains("Another post title"));
    assert!(html.contains("Third post &amp; more"));
}

#[actix_rt::test]
async fn show_renders_post_page() {
    let app = TestApp::spawn().await;
    app.seed_post("Other post", "Other description").await;
    let post = app.seed_post("Some title", "A longer description of the post").await;

    let response = app.client
        .get(app.url(&format!("/posts/{}", post.id)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("<h1>Post</h1>"));
    assert!(html.contains("Some title"));
    assert!(html.contains("A longer description of the post"));
    assert!(!html.contains("Other post"));
}

#[actix_rt::test]
async fn show_of_missing_post_is_404() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/posts/12345")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn store_redirects_to_new_post() {
    let app = TestApp::spawn().await;

    let form = Form::new()
        .text("title", "Some title")
        .text("description", "Description")
        .part("image", jpg_part());
    let response = app.client
        .post(app.url("/posts"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.posts.count(), 1);

    let post = app.posts.find(1).unwrap();
    assert_eq!(location(&response), format!("/posts/{}", post.id));

    let image_url = post.image_url.unwrap();
    assert_image_path(&image_url);
    assert!(app.stored(&image_url).await);
}

#[actix_rt::test]
async fn store_with_empty_title_redirects_back() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/posts"))
        .header(header::REFERER, app.url("/posts/create"))
        .form(&[("title", ""), ("description", "dasdad")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), app.url("/posts/create"));
    assert!(sets_cookie(&response, "flash"));
    assert_eq!(app.posts.count(), 0);
}

#[actix_rt::test]
async fn store_with_string_image_redirects_without_creating() {
    let app = TestApp::spawn().await;

    let form = Form::new()
        .text("title", "Some title")
        .text("description", "Description")
        .text("image", "my_image.jpg");
    let response = app.client
        .post(app.url("/posts"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts/create");
    assert_eq!(app.posts.count(), 0);
}

#[actix_rt::test]
async fn flashed_errors_are_shown_on_the_form() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/posts"))
        .form(&[("title", ""), ("description", "dasdad")])
        .send()
        .await
        .unwrap();
    let flash = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("flash="))
        .and_then(|value| value.split(';').next())
        .unwrap()
        .to_string();

    let html = app.client
        .get(app.url("/posts/create"))
        .header(header::COOKIE, flash)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("The title field is required."));
    assert!(html.contains("dasdad"));
}

#[actix_rt::test]
async fn long_old_input_keeps_flashed_errors_within_cookie_size() {
    let app = TestApp::spawn().await;
    let description = "é".repeat(2000);

    let response = app.client
        .post(app.url("/posts"))
        .form(&[("title", ""), ("description", description.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let flash = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("flash="))
        .unwrap()
        .to_string();
    assert!(flash.len() < 4096, "flash cookie is {} bytes", flash.len());

    let html = app.client
        .get(app.url("/posts/create"))
        .header(header::COOKIE, flash.split(';').next().unwrap())
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("The title field is required."));
    assert_eq!(app.posts.count(), 0);
}

#[actix_rt::test]
async fn unsupported_body_renders_html_error_page() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/posts"))
        .header(header::CONTENT_TYPE, "text/plain")
        .body("title=Some title")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got {}", content_type);
    assert_eq!(app.posts.count(), 0);
}

#[actix_rt::test]
async fn update_through_method_override() {
    let app = TestApp::spawn().await;
    let post = app.seed_post("Some title", "Description").await;

    let form = Form::new()
        .text("_method", "PATCH")
        .text("title", "Title edited")
        .text("description", "Description edited")
        .part("image", jpg_part());
    let response = app.client
        .post(app.url(&format!("/posts/{}", post.id)))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/posts/{}", post.id));

    let updated = app.posts.find(post.id).unwrap();
    assert_eq!(updated.title, "Title edited");
    assert_eq!(updated.description, "Description edited");
    assert_image_path(updated.image_url.as_deref().unwrap());
}

#[actix_rt::test]
async fn invalid_update_leaves_post_untouched() {
    let app = TestApp::spawn().await;
    let post = app.seed_post("Some title", "Description").await;

    let response = app.client
        .patch(app.url(&format!("/posts/{}", post.id)))
        .form(&[("title", "Title edited"), ("image", "my_image.jpg")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/posts/{}/edit", post.id));
    assert_eq!(app.posts.find(post.id).unwrap().title, "Some title");
}

#[actix_rt::test]
async fn guest_cannot_delete() {
    let app = TestApp::spawn().await;
    let post = app.seed_post("Title", "Description").await;

    let response = app.client
        .delete(app.url(&format!("/posts/{}", post.id)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(app.posts.count(), 1);
}

#[actix_rt::test]
async fn guest_cannot_delete_through_method_override() {
    let app = TestApp::spawn().await;
    let post = app.seed_post("Title", "Description").await;

    let response = app.client
        .post(app.url(&format!("/posts/{}", post.id)))
        .form(&[("_method", "DELETE")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.posts.count(), 1);
}

#[actix_rt::test]
async fn signed_in_user_deletes_post() {
    let app = TestApp::spawn().await;
    let post = app.seed_post("Title", "Description").await;
    app.seed_post("Other", "Description").await;

    let response = app.client
        .delete(app.url(&format!("/posts/{}", post.id)))
        .header(header::COOKIE, app.session_cookie())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.posts.count(), 1);
    assert!(app.posts.find(post.id).is_none());
}

#[actix_rt::test]
async fn login_sets_session_cookie() {
    let app = TestApp::spawn().await;
    app.users.insert("author@example.com", "Secret123!");

    let response = app.client
        .post(app.url("/login"))
        .form(&[("email", "author@example.com"), ("password", "Secret123!")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts");
    assert!(sets_cookie(&response, "access_token"));
}

#[actix_rt::test]
async fn failed_login_redirects_back_to_form() {
    let app = TestApp::spawn().await;
    app.users.insert("author@example.com", "Secret123!");

    let response = app.client
        .post(app.url("/login"))
        .form(&[("email", "author@example.com"), ("password", "wrong")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(!sets_cookie(&response, "access_token"));
    assert!(sets_cookie(&response, "flash"));
}

#[actix_rt::test]
async fn stored_image_is_served() {
    let app = TestApp::spawn().await;

    let form = Form::new()
        .text("title", "Some title")
        .text("description", "Description")
        .part("image", jpg_part());
    app.client.post(app.url("/posts")).multipart(form).send().await.unwrap();
    let image_url = app.posts.find(1).unwrap().image_url.unwrap();

    let response = app.client
        .get(app.url(&format!("/storage/{}", image_url)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
    assert_eq!(response.bytes().await.unwrap().as_ref(), &JPEG_MAGIC);
}
