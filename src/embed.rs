pub const EMBED_SCRIPT_URL: &str = "https://chatbotsaas.com/embed.js";

/// Lowercased name with every whitespace run, edges included, replaced by `-`.
pub fn chatbot_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_run {
                slug.push('-');
            }
            in_run = true;
        } else {
            slug.push(c);
            in_run = false;
        }
    }
    slug
}

/// The `<script>` tag a site owner pastes to embed the chatbot. Display only.
pub fn snippet(name: &str, issued_at_ms: i64) -> String {
    let chatbot_id = format!("{}-{}", chatbot_slug(name), issued_at_ms);
    format!(
        r#"<script>
  (function(d,s,id){{
    var js,fjs=d.getElementsByTagName(s)[0];
    if(d.getElementById(id))return;
    js=d.createElement(s);js.id=id;
    js.src="{EMBED_SCRIPT_URL}";
    js.setAttribute('data-chatbot-id','{chatbot_id}');
    fjs.parentNode.insertBefore(js,fjs);
  }})(document,'script','chatbot-embed');
</script>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(chatbot_slug("Customer Support Bot"), "customer-support-bot");
        assert_eq!(chatbot_slug("  Shop \t Bot  "), "-shop-bot-");
        assert_eq!(chatbot_slug(" Shop Bot "), "-shop-bot-");
        assert_eq!(chatbot_slug("FAQ\n\nHelper"), "faq-helper");
        assert_eq!(chatbot_slug(""), "");
    }

    #[test]
    fn test_snippet() {
        let s = snippet("Shop Bot", 1700000000000);
        assert!(s.starts_with("<script>"));
        assert!(s.ends_with("</script>"));
        assert!(s.contains("js.src=\"https://chatbotsaas.com/embed.js\";"));
        assert!(s.contains("'data-chatbot-id','shop-bot-1700000000000'"));
        assert!(s.contains("})(document,'script','chatbot-embed');"));
    }
}
