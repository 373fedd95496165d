use std::fmt::Write;

use chrono::Datelike;
use folio_api::CommentWithLikes;

pub struct ProjectTab {
    pub name: &'static str,
    pub images: &'static [&'static str],
}

pub const PROJECT_TABS: &[ProjectTab] = &[
    ProjectTab {
        name: "website",
        images: &["images/projects/photo-one.png"],
    },
    ProjectTab {
        name: "roblox",
        images: &["images/projects/photo-two.png"],
    },
    ProjectTab {
        name: "content",
        images: &[
            "images/projects/photo-three.png",
            "images/projects/photo-five.png",
            "images/projects/photo-six.png",
        ],
    },
    ProjectTab {
        name: "misc",
        images: &["images/projects/photo-four.png"],
    },
];

const NAV: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/about", "About"),
    ("/projects", "Projects"),
    ("/contact", "Contact"),
];

/// Year shown in the footer of every page, read from the local clock
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn escape(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => res.push_str("&amp;"),
            '<' => res.push_str("&lt;"),
            '>' => res.push_str("&gt;"),
            '"' => res.push_str("&quot;"),
            '\'' => res.push_str("&#x27;"),
            c => res.push(c),
        }
    }
    res
}

fn layout(title: &str, year: i32, body: &str) -> String {
    let mut nav = String::new();
    for (href, label) in NAV {
        // writing to a String cannot fail
        let _ = write!(nav, r#"<a href="{href}">{label}</a>"#);
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav>{nav}</nav>
<main>
{body}
</main>
<footer>&copy; {year}</footer>
</body>
</html>
"#
    )
}

pub fn home(year: i32) -> String {
    layout(
        "Home",
        year,
        "<h1>Welcome</h1>\n<p>Have a look around: the projects page shows what I have been building.</p>",
    )
}

pub fn about(year: i32, comments: &[CommentWithLikes]) -> String {
    let mut body = String::from("<h1>About</h1>\n<section id=\"comments\">\n<h2>Comments</h2>\n");
    if comments.is_empty() {
        body.push_str("<p class=\"no-comments\">No comments yet.</p>\n");
    } else {
        body.push_str("<ul class=\"comments\">\n");
        for c in comments {
            let _ = writeln!(
                body,
                r#"<li class="comment" data-comment-id="{id}" data-likes="{likes}"><p>{text}</p><span class="likes">{likes} {noun}</span></li>"#,
                id = c.id.0,
                likes = c.likes,
                text = escape(&c.text),
                noun = if c.likes == 1 { "like" } else { "likes" },
            );
        }
        body.push_str("</ul>\n");
    }
    body.push_str("</section>");
    layout("About", year, &body)
}

pub fn projects(year: i32) -> String {
    let mut body = String::from("<h1>Projects</h1>\n");
    for tab in PROJECT_TABS {
        let _ = writeln!(
            body,
            r#"<section class="project-tab" id="tab-{name}">"#,
            name = tab.name
        );
        let _ = writeln!(body, "<h2>{}</h2>", tab.name);
        for img in tab.images {
            let _ = writeln!(body, r#"<img src="/static/{img}" alt="{}">"#, tab.name);
        }
        body.push_str("</section>\n");
    }
    layout("Projects", year, &body)
}

pub fn contact(year: i32) -> String {
    layout(
        "Contact",
        year,
        "<h1>Contact</h1>\n<p>Want to work together or just say hi? Reach out and I will get back to you.</p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_api::CommentId;

    #[test]
    fn every_page_shows_the_year() {
        for page in [home(1999), about(1999, &[]), projects(1999), contact(1999)] {
            assert!(page.contains("<footer>&copy; 1999</footer>"), "{page}");
        }
    }

    #[test]
    fn comment_text_is_escaped() {
        let page = about(
            2024,
            &[CommentWithLikes {
                id: CommentId(3),
                text: String::from("<script>alert('hi') & \"bye\"</script>"),
                likes: 1,
            }],
        );
        assert!(page.contains(
            "<p>&lt;script&gt;alert(&#x27;hi&#x27;) &amp; &quot;bye&quot;&lt;/script&gt;</p>"
        ));
        assert!(page.contains(r#"data-comment-id="3" data-likes="1""#));
        assert!(page.contains(r#"<span class="likes">1 like</span>"#));
        assert!(!page.contains("<script>"));
        assert!(!page.contains("<button"));
    }

    #[test]
    fn empty_comment_board() {
        assert!(about(2024, &[]).contains("No comments yet."));
    }

    #[test]
    fn projects_list_every_tab_in_order() {
        let page = projects(2024);
        let positions: Vec<usize> = ["website", "roblox", "content", "misc"]
            .iter()
            .map(|t| page.find(&format!("id=\"tab-{t}\"")).expect("missing tab"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        let content = &page[positions[2]..positions[3]];
        assert_eq!(content.matches("<img ").count(), 3);
        assert!(content.find("photo-three").unwrap() < content.find("photo-five").unwrap());
        assert!(content.find("photo-five").unwrap() < content.find("photo-six").unwrap());
    }
}
