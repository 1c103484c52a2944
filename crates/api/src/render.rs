//! HTML rendering.
//!
//! Pages are small formatted strings behind one escaping helper; the
//! interesting surface is which data each page shows, not its styling.

use bookmarks_core::{FeedItem, FeedTarget};
use bookmarks_db::entities::{image, user, user_profile};

/// Escape a string for inclusion in HTML text or attribute values.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared page skeleton with the section navigation.
fn layout(title: &str, section: &str, body: &str) -> String {
    let nav: String = [
        ("dashboard", "/dashboard", "My dashboard"),
        ("images", "/images", "Images"),
        ("people", "/users", "People"),
    ]
    .iter()
    .map(|(key, href, label)| {
        let class = if *key == section { " class=\"selected\"" } else { "" };
        format!("<li{class}><a href=\"{href}\">{label}</a></li>")
    })
    .collect();

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{} | Bookmarks</title></head>\n\
         <body>\n<ul id=\"menu\">{nav}</ul>\n<div id=\"content\">\n{body}\n</div>\n</body>\n</html>",
        escape(title)
    )
}

/// Render a list of form errors.
fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!("<ul class=\"errorlist\">{items}</ul>")
}

/// A user's display name: "First Last" when set, username otherwise.
fn display_name(user: &user::Model) -> String {
    match (&user.first_name, &user.last_name) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.clone(),
        _ => user.username.clone(),
    }
}

/// The dashboard page with the viewer's activity feed.
#[must_use]
pub fn dashboard_page(viewer_username: &str, feed: &[FeedItem]) -> String {
    let mut body = format!(
        "<h1>Dashboard</h1>\n<p>Welcome, {}.</p>\n<div id=\"action-list\">",
        escape(viewer_username)
    );

    if feed.is_empty() {
        body.push_str("<p>No activity yet.</p>");
    }

    for item in feed {
        let target = match &item.target {
            Some(FeedTarget::User { id: _, username }) => format!(
                " <a href=\"/users/{}\">{}</a>",
                escape(username),
                escape(username)
            ),
            Some(FeedTarget::Image { id, title, slug }) => format!(
                " <a href=\"/images/{}/{}\">{}</a>",
                escape(id),
                escape(slug),
                escape(title)
            ),
            None => String::new(),
        };
        body.push_str(&format!(
            "<div class=\"action\"><a href=\"/users/{}\">{}</a> {}{target}</div>\n",
            escape(&item.actor.username),
            escape(&item.actor.username),
            escape(&item.verb),
        ));
    }
    body.push_str("</div>");

    layout("Dashboard", "dashboard", &body)
}

/// The registration form.
#[must_use]
pub fn register_form_page(username_value: &str, errors: &[String]) -> String {
    let body = format!(
        "<h1>Create an account</h1>\n{}\
         <form method=\"post\" action=\"/register\">\n\
         <p><label>Username <input type=\"text\" name=\"username\" value=\"{}\"></label></p>\n\
         <p><label>Password <input type=\"password\" name=\"password\"></label></p>\n\
         <p><label>Repeat password <input type=\"password\" name=\"password_confirm\"></label></p>\n\
         <p><input type=\"submit\" value=\"Create my account\"></p>\n\
         </form>",
        error_list(errors),
        escape(username_value)
    );
    layout("Create an account", "", &body)
}

/// The post-registration welcome page.
#[must_use]
pub fn register_done_page(username: &str) -> String {
    let body = format!(
        "<h1>Welcome {}!</h1>\n<p>Your account has been successfully created.</p>",
        escape(username)
    );
    layout("Welcome", "", &body)
}

/// The profile edit form, spanning user and profile fields.
#[must_use]
pub fn profile_edit_page(
    user: &user::Model,
    profile: &user_profile::Model,
    flash: Option<&str>,
    errors: &[String],
) -> String {
    let flash_html = flash.map_or_else(String::new, |msg| {
        format!("<p class=\"flash\">{}</p>\n", escape(msg))
    });

    let value = |v: &Option<String>| escape(v.as_deref().unwrap_or(""));

    let body = format!(
        "<h1>Edit your profile</h1>\n{flash_html}{}\
         <form method=\"post\" action=\"/account/edit\">\n\
         <p><label>First name <input type=\"text\" name=\"first_name\" value=\"{}\"></label></p>\n\
         <p><label>Last name <input type=\"text\" name=\"last_name\" value=\"{}\"></label></p>\n\
         <p><label>Email <input type=\"text\" name=\"email\" value=\"{}\"></label></p>\n\
         <p><label>Date of birth <input type=\"text\" name=\"date_of_birth\" value=\"{}\"></label></p>\n\
         <p><label>Photo URL <input type=\"text\" name=\"photo_url\" value=\"{}\"></label></p>\n\
         <p><input type=\"submit\" value=\"Save changes\"></p>\n\
         </form>",
        error_list(errors),
        value(&user.first_name),
        value(&user.last_name),
        value(&user.email),
        value(&profile.date_of_birth),
        value(&profile.photo_url),
    );
    layout("Edit your profile", "", &body)
}

/// The people listing.
#[must_use]
pub fn user_list_page(users: &[user::Model]) -> String {
    let mut body = "<h1>People</h1>\n<div id=\"people-list\">".to_string();
    for user in users {
        body.push_str(&format!(
            "<div class=\"user\"><a href=\"/users/{}\">{}</a></div>\n",
            escape(&user.username),
            escape(&display_name(user))
        ));
    }
    body.push_str("</div>");
    layout("People", "people", &body)
}

/// A user's detail page with their bookmarks and follow button.
#[must_use]
pub fn user_detail_page(
    user: &user::Model,
    images: &[image::Model],
    followers: u64,
    is_following: Option<bool>,
) -> String {
    let follow_button = is_following.map_or_else(String::new, |following| {
        let (action, label) = if following {
            ("unfollow", "Unfollow")
        } else {
            ("follow", "Follow")
        };
        format!(
            "<a href=\"#\" data-id=\"{}\" data-action=\"{action}\" class=\"follow button\">{label}</a>\n",
            escape(&user.id)
        )
    });

    let mut body = format!(
        "<h1>{}</h1>\n<p class=\"count\"><span class=\"total\">{followers}</span> followers</p>\n{follow_button}\
         <div id=\"image-list\">",
        escape(&display_name(user))
    );
    for img in images {
        body.push_str(&image_item(img));
    }
    body.push_str("</div>");

    layout(&display_name(user), "people", &body)
}

/// The bookmark-an-image form, optionally prefilled from query parameters.
#[must_use]
pub fn image_create_page(url_value: &str, title_value: &str, errors: &[String]) -> String {
    let body = format!(
        "<h1>Bookmark an image</h1>\n{}\
         <form method=\"post\" action=\"/images/create\">\n\
         <p><label>URL <input type=\"text\" name=\"url\" value=\"{}\"></label></p>\n\
         <p><label>Title <input type=\"text\" name=\"title\" value=\"{}\"></label></p>\n\
         <p><label>Description <textarea name=\"description\"></textarea></label></p>\n\
         <p><input type=\"submit\" value=\"Bookmark it!\"></p>\n\
         </form>",
        error_list(errors),
        escape(url_value),
        escape(title_value)
    );
    layout("Bookmark an image", "images", &body)
}

/// One image entry in a list or detail context.
fn image_item(img: &image::Model) -> String {
    format!(
        "<div class=\"image\"><a href=\"/images/{}/{}\"><img src=\"{}\" alt=\"{}\"></a>\
         <div class=\"info\"><a href=\"/images/{}/{}\" class=\"title\">{}</a></div></div>\n",
        escape(&img.id),
        escape(&img.slug),
        escape(&img.url),
        escape(&img.title),
        escape(&img.id),
        escape(&img.slug),
        escape(&img.title),
    )
}

/// An image's detail page with the like button.
#[must_use]
pub fn image_detail_page(img: &image::Model, owner_username: &str, liked: Option<bool>) -> String {
    let like_button = liked.map_or_else(String::new, |liked| {
        let (action, label) = if liked { ("unlike", "Unlike") } else { ("like", "Like") };
        format!(
            "<a href=\"#\" data-id=\"{}\" data-action=\"{action}\" class=\"like button\">{label}</a>\n",
            escape(&img.id)
        )
    });

    let description = img
        .description
        .as_deref()
        .map_or_else(String::new, |d| format!("<p>{}</p>\n", escape(d)));

    let body = format!(
        "<h1>{}</h1>\n<img src=\"{}\" class=\"image-detail\">\n{description}\
         <p>Bookmarked by <a href=\"/users/{}\">{}</a></p>\n\
         <p class=\"count\"><span class=\"total\">{}</span> likes</p>\n{like_button}",
        escape(&img.title),
        escape(&img.url),
        escape(owner_username),
        escape(owner_username),
        img.total_likes,
    );
    layout(&img.title, "images", &body)
}

/// The image-list fragment: one page of images, most-liked-first.
#[must_use]
pub fn image_list_fragment(images: &[image::Model]) -> String {
    images.iter().map(image_item).collect()
}

/// The full image-list page wrapping a fragment.
#[must_use]
pub fn image_list_page(fragment: &str, page: u64, has_next: bool) -> String {
    let more = if has_next {
        format!(
            "<a href=\"/images?page={}\" id=\"more\">More images</a>",
            page + 1
        )
    } else {
        String::new()
    };
    let body = format!("<h1>Images bookmarked</h1>\n<div id=\"image-list\">{fragment}</div>\n{more}");
    layout("Images bookmarked", "images", &body)
}
