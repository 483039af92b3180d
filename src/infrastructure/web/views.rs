//! Server-rendered HTML pages. Every interpolated value goes through `e`.

use crate::{
    constants::{LOGIN_PATH, POSTS_PATH},
    entities::post::Post,
    infrastructure::web::flash::Flash,
};

/// Escapes text for element content and quoted attribute values.
fn e(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<nav><a href="{posts}">Posts</a> <a href="{posts}/create">New post</a> <a href="{login}">Login</a></nav>
<main>
{body}
</main>
</body>
</html>"#,
        title = e(title),
        posts = POSTS_PATH,
        login = LOGIN_PATH,
        body = body,
    )
}

fn image_tag(post: &Post) -> String {
    match &post.image_url {
        Some(path) => format!(r#"<img src="/storage/{}" alt="{}">"#, e(path), e(&post.title)),
        None => String::new(),
    }
}

pub fn index(posts: &[Post]) -> String {
    let items: String = if posts.is_empty() {
        "<p>No posts yet.</p>".to_string()
    } else {
        let rows = posts
            .iter()
            .map(|post| {
                format!(
                    r#"<li><a href="{}/{}">{}</a></li>"#,
                    POSTS_PATH,
                    post.id,
                    e(&post.title)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("<ul>\n{}\n</ul>", rows)
    };

    layout("Posts", &format!("<h1>Posts</h1>\n{}", items))
}

pub fn show(post: &Post) -> String {
    let body = format!(
        r#"<h1>Post</h1>
<article>
<h2>{title}</h2>
{image}
<p>{description}</p>
</article>
<a href="{posts}/{id}/edit">Edit</a>
<form method="POST" action="{posts}/{id}">
<input type="hidden" name="_method" value="DELETE">
<button type="submit">Delete</button>
</form>"#,
        title = e(&post.title),
        image = image_tag(post),
        description = e(&post.description),
        posts = POSTS_PATH,
        id = post.id,
    );

    layout(&post.title, &body)
}

fn error_line(flash: Option<&Flash>, field: &str) -> String {
    flash
        .and_then(|f| f.error(field))
        .map(|message| format!(r#"<p class="error">{}</p>"#, e(message)))
        .unwrap_or_default()
}

/// Create form when `post` is `None`, edit form otherwise.
pub fn post_form(post: Option<&Post>, flash: Option<&Flash>) -> String {
    let old = |field: &str, current: Option<&str>| {
        flash
            .and_then(|f| f.old(field))
            .or(current)
            .map(e)
            .unwrap_or_default()
    };

    let (heading, action, method_field) = match post {
        Some(post) => (
            "Edit post",
            format!("{}/{}", POSTS_PATH, post.id),
            r#"<input type="hidden" name="_method" value="PATCH">"#,
        ),
        None => ("Create post", POSTS_PATH.to_string(), ""),
    };

    let current_image = post.map(image_tag).unwrap_or_default();

    let body = format!(
        r#"<h1>{heading}</h1>
<form method="POST" action="{action}" enctype="multipart/form-data">
{method_field}
<label for="title">Title</label>
<input id="title" type="text" name="title" value="{title}">
{title_error}
<label for="description">Description</label>
<textarea id="description" name="description">{description}</textarea>
{description_error}
{current_image}
<label for="image">Image</label>
<input id="image" type="file" name="image" accept="image/*">
{image_error}
<button type="submit">Save</button>
</form>"#,
        heading = heading,
        action = action,
        method_field = method_field,
        title = old("title", post.map(|p| p.title.as_str())),
        title_error = error_line(flash, "title"),
        description = old("description", post.map(|p| p.description.as_str())),
        description_error = error_line(flash, "description"),
        current_image = current_image,
        image_error = error_line(flash, "image"),
    );

    layout(heading, &body)
}

pub fn login(flash: Option<&Flash>) -> String {
    let email = flash.and_then(|f| f.old("email")).map(e).unwrap_or_default();

    let body = format!(
        r#"<h1>Login</h1>
<form method="POST" action="{login}">
<label for="email">Email</label>
<input id="email" type="email" name="email" value="{email}">
{email_error}
<label for="password">Password</label>
<input id="password" type="password" name="password">
<button type="submit">Login</button>
</form>"#,
        login = LOGIN_PATH,
        email = email,
        email_error = error_line(flash, "email"),
    );

    layout("Login", &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    layout(title, &format!("<h1>{}</h1>\n<p>{}</p>", e(title), e(message)))
}
