//! Pure list transformations: ordering, record to card, and card to markup.

use std::borrow::Cow;

use giftlist_types::Gift;

/// Escapes HTML special characters (`& < > " '`).
///
/// Borrows when nothing needs escaping.
pub fn html_escape(s: &str) -> Cow<'_, str> {
    if s.contains(['&', '<', '>', '"', '\'']) {
        let mut escaped = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                _ => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}

pub fn sort_newest_first(gifts: &mut [Gift]) {
    gifts.sort_by(Gift::newest_first);
}

/// What one list entry shows. Text is kept raw; escaping happens when it is
/// turned into markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftCard {
    pub id: i64,
    pub title: String,
    pub suggested_by: String,
    /// `dd/mm/YYYY`
    pub date: String,
    pub link: Option<String>,
}

impl From<&Gift> for GiftCard {
    fn from(gift: &Gift) -> Self {
        Self {
            id: gift.id,
            title: gift.presente.clone(),
            suggested_by: gift.nome.clone(),
            date: gift.created_at.format("%d/%m/%Y").to_string(),
            link: gift.has_link().then(|| gift.link.clone()),
        }
    }
}

impl GiftCard {
    pub fn to_html(&self) -> String {
        let link = self
            .link
            .as_deref()
            .map(|href| {
                format!(
                    "\n  <a href=\"{}\" target=\"_blank\" rel=\"noopener\" class=\"gift-link\">See gift →</a>",
                    html_escape(href)
                )
            })
            .unwrap_or_default();

        format!(
            "<div class=\"gift-card\">\n  <div class=\"gift-card-header\">\n    <div>\n      \
             <div class=\"gift-name\">{}</div>\n      \
             <div class=\"suggested-by\">Suggested by: {}</div>\n      \
             <div class=\"gift-date\">{}</div>\n    </div>\n    \
             <button class=\"btn-delete\" data-id=\"{}\" title=\"Delete suggestion\">🗑️</button>\n  \
             </div>{}\n</div>",
            html_escape(&self.title),
            html_escape(&self.suggested_by),
            self.date,
            self.id,
            link,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// No suggestions: show the placeholder instead of a list.
    Empty,
    Cards(Vec<GiftCard>),
}

impl ListView {
    /// Sort newest first and map each gift to a card.
    pub fn from_gifts(mut gifts: Vec<Gift>) -> Self {
        if gifts.is_empty() {
            return ListView::Empty;
        }
        sort_newest_first(&mut gifts);
        ListView::Cards(gifts.iter().map(GiftCard::from).collect())
    }

    pub fn cards(&self) -> &[GiftCard] {
        match self {
            ListView::Empty => &[],
            ListView::Cards(cards) => cards.as_slice(),
        }
    }

    pub fn ids(&self) -> Vec<i64> {
        self.cards().iter().map(|c| c.id).collect()
    }

    pub fn to_html(&self) -> String {
        match self {
            ListView::Empty => {
                "<div class=\"empty-state\">No suggestions yet. Be the first!</div>".to_string()
            }
            ListView::Cards(cards) => cards
                .iter()
                .map(GiftCard::to_html)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn gift(id: i64, secs: i64) -> Gift {
        Gift {
            id,
            nome: "Ana".into(),
            presente: format!("Gift {}", id),
            link: String::new(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn escape_handles_all_special_chars() {
        assert_eq!(html_escape("plain"), Cow::Borrowed("plain"));
        assert_eq!(
            html_escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
    }

    #[test]
    fn any_permutation_renders_newest_first() {
        let base = vec![gift(1, 100), gift(2, 300), gift(3, 200), gift(4, 300)];
        let orders: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]];

        for order in orders {
            let input: Vec<Gift> = order.iter().map(|&i| base[i].clone()).collect();
            assert_eq!(ListView::from_gifts(input).ids(), vec![4, 2, 3, 1]);
        }
    }

    #[test]
    fn empty_list_is_placeholder() {
        let view = ListView::from_gifts(Vec::new());
        assert_eq!(view, ListView::Empty);
        assert!(view.to_html().contains("empty-state"));
    }

    #[test]
    fn card_formats_date_and_omits_missing_link() {
        let card = GiftCard::from(&gift(7, 1_700_000_000));
        assert_eq!(card.date, "14/11/2023");
        assert_eq!(card.link, None);
        assert!(!card.to_html().contains("gift-link"));
    }

    #[test]
    fn markup_escapes_user_text() {
        let mut g = gift(1, 0);
        g.nome = "<b>Ana</b>".into();
        g.presente = "Mug & \"cup\"".into();
        g.link = "https://example.com/?a=1&b=\"2\"".into();

        let html = GiftCard::from(&g).to_html();
        assert!(html.contains("Suggested by: &lt;b&gt;Ana&lt;/b&gt;"));
        assert!(html.contains("Mug &amp; &quot;cup&quot;"));
        assert!(html.contains("href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\""));
        assert!(!html.contains("<b>"));
    }
}
