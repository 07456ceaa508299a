//! Table of contents renderer tests.

use mkdhtml::{Buffer, RenderFlags, Renderer};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn toc(levels: &[u32], nesting_level: u32) -> String {
    let mut r = Renderer::toc(nesting_level);
    let mut ob = Buffer::default();
    for (n, &level) in levels.iter().enumerate() {
        let mut title = Buffer::default();
        r.normal_text(&mut title, format!("S{n}").as_bytes());
        r.header(&mut ob, title.as_bytes(), level);
    }
    r.doc_footer(&mut ob);
    ob.to_str_lossy().into_owned()
}

/// Tags in document order must close in reverse order of opening.
fn is_balanced(html: &str) -> bool {
    let mut stack = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        rest = &rest[start..];
        let Some(end) = rest.find('>') else {
            return false;
        };
        let tag = &rest[1..end];
        rest = &rest[end + 1..];

        let name = tag.split(' ').next().unwrap_or_default();
        match name {
            "ul" | "li" => stack.push(name),
            "/ul" | "/li" => {
                if stack.pop() != Some(&name[1..]) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

#[test]
fn one_two_two_one() {
    let html = toc(&[1, 2, 2, 1], 6);
    assert_eq!(
        html,
        "<ul>\n\
         <li><a href=\"#toc_0\">S0</a>\n\
         <ul>\n\
         <li><a href=\"#toc_1\">S1</a>\n\
         </li>\n\
         <li><a href=\"#toc_2\">S2</a>\n\
         </li>\n\
         </ul>\n\
         </li>\n\
         <li><a href=\"#toc_3\">S3</a>\n\
         </li>\n\
         </ul>\n"
    );
    assert!(is_balanced(&html));

    // The first top-level item holds a list with exactly the two subsections.
    let first_item_end = html.find("<li><a href=\"#toc_3\">").unwrap_or(html.len());
    let nested = &html[..first_item_end];
    assert_eq!(nested.matches("<ul>").count(), 2);
    assert_eq!(nested.matches("<li>").count(), 3);
}

#[test]
fn deep_then_shallow() {
    let html = toc(&[1, 2, 3], 6);
    assert!(html.ends_with("</li>\n</ul>\n</li>\n</ul>\n</li>\n</ul>\n"));
    assert!(is_balanced(&html));
}

#[test]
fn header_text_is_escaped_by_text_slot() {
    let mut r = Renderer::toc(6);
    let mut title = Buffer::default();
    r.normal_text(&mut title, b"A & B");
    let mut ob = Buffer::default();
    r.header(&mut ob, title.as_bytes(), 1);
    r.doc_footer(&mut ob);
    assert_eq!(
        ob.to_str_lossy(),
        "<ul>\n<li><a href=\"#toc_0\">A &amp; B</a>\n</li>\n</ul>\n"
    );
}

#[test]
fn anchors_match_html_renderer() {
    let levels = [1, 2, 4, 2];

    let mut html = Renderer::html(RenderFlags::TOC);
    html.options_mut().toc.nesting_level = 3;
    let mut page = Buffer::default();
    for level in levels {
        html.header(&mut page, b"x", level);
    }

    let contents = toc(&levels, 3);
    for n in 0..3 {
        let anchor = format!("<a name=\"toc_{n}\"></a>");
        let href = format!("href=\"#toc_{n}\"");
        assert!(page.to_str_lossy().contains(&anchor), "{anchor}");
        assert!(contents.contains(&href), "{href}");
    }
    assert!(!contents.contains("toc_3"));
    assert!(!page.to_str_lossy().contains("toc_3"));
}

#[test]
fn out_of_range_levels_keep_anchors_aligned() {
    let levels = [1, 7, 2, 0, 3];

    let mut html = Renderer::html(RenderFlags::TOC);
    let mut page = Buffer::default();
    for (n, level) in levels.into_iter().enumerate() {
        let mut title = Buffer::default();
        html.normal_text(&mut title, format!("S{n}").as_bytes());
        html.header(&mut page, title.as_bytes(), level);
    }
    let page = page.to_str_lossy();
    let contents = toc(&levels, 6);

    assert!(page.contains("<a name=\"toc_1\"></a><h6>S1</h6>"));
    assert!(page.contains("<a name=\"toc_3\"></a><h1>S3</h1>"));
    for (n, level) in levels.into_iter().enumerate() {
        let h = level.clamp(1, 6);
        let anchored = format!("<a name=\"toc_{n}\"></a><h{h}>S{n}</h{h}>");
        assert!(page.contains(&anchored), "{page}");
        assert!(contents.contains(&format!("<a href=\"#toc_{n}\">S{n}</a>")), "{contents}");
    }
    assert!(is_balanced(&contents));
}

#[test]
fn no_headers() {
    assert_eq!(toc(&[], 6), "");
}

proptest! {
    #[test]
    fn always_balanced(levels in prop::collection::vec(1u32..=6, 0..24), nesting in 1u32..=6) {
        let html = toc(&levels, nesting);
        prop_assert!(is_balanced(&html), "{}", html);
        let included = levels.iter().filter(|&&l| l <= nesting).count();
        prop_assert_eq!(html.matches("<a href=").count(), included);
    }
}
