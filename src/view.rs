//! Server-side HTML rendering of the drop page.
//!
//! Styling is out of scope; the markup carries stable ids/classes for it.

use crate::content::Collection;
use crate::page::{mint_button, short_address, PageState, Remote};
use ethers_core::types::Address;

/// Render the full drop page.
pub fn render_drop_page(
    marketplace: &str,
    collection: &Collection,
    state: &PageState,
    wallet: Option<&str>,
) -> String {
    let wallet_control = if wallet.is_some() { "Sign Out" } else { "Sign In" };

    let wallet_banner = match wallet {
        Some(address) => format!(
            r#"<p class="wallet-banner">You're logged in with wallet {}</p>"#,
            escape(&short_address(address))
        ),
        None => String::new(),
    };

    let claimed_counter = match &state.supply {
        Remote::Loaded(supply) => format!(
            "{}/{} NFT's claimed",
            supply.claimed, supply.total
        ),
        Remote::Failed(_) => "Supply count unavailable".to_string(),
        Remote::NotStarted | Remote::Loading => "Loading Supply Count...".to_string(),
    };

    // Wallet presence drives the policy; the rendered page has no live
    // address beyond the banner.
    let address_for_policy: Option<Address> =
        wallet.and_then(|w| w.parse::<Address>().ok());
    let button = mint_button(state, address_for_policy);
    let disabled = if button.enabled() { "" } else { " disabled" };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | {marketplace}</title>
</head>
<body>
<div class="drop-page">
  <aside class="collection-pane">
    <img class="preview" src="{preview}" alt="{title}">
    <h1>{title}</h1>
    <h2>{description}</h2>
  </aside>
  <main class="mint-pane">
    <header>
      <h1>The <span class="accent">{marketplace}</span> Market Place</h1>
      <form method="post" action="/wallet">
        <button class="wallet-toggle">{wallet_control}</button>
      </form>
    </header>
    <hr>
    {wallet_banner}
    <section class="hero">
      <img class="main" src="{main}" alt="{nft_name}">
      <h1>{nft_name} | NFT Drop</h1>
      <p class="creator">by {creator}</p>
      <p class="claimed">{claimed_counter}</p>
    </section>
    <form method="post" action="/drop/{slug}/mint">
      <button class="mint"{disabled}>{button_label}</button>
    </form>
    <div id="notifications"></div>
  </main>
</div>
</body>
</html>
"#,
        title = escape(&collection.title),
        marketplace = escape(marketplace),
        preview = escape(&collection.preview_image),
        description = escape(&collection.description),
        main = escape(&collection.main_image),
        nft_name = escape(&collection.nft_collection_name),
        creator = escape(&collection.creator.name),
        claimed_counter = escape(&claimed_counter),
        slug = escape(&collection.slug),
        wallet_control = wallet_control,
        wallet_banner = wallet_banner,
        disabled = disabled,
        button_label = escape(&button.label()),
    )
}

/// 404 page for an unknown slug.
pub fn render_not_found(slug: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Not Found</title></head>
<body>
<main class="not-found">
  <h1>No drop here</h1>
  <p>There is no collection at <code>{}</code>.</p>
</main>
</body>
</html>
"#,
        escape(slug)
    )
}

/// Minimal HTML escaping for interpolated text and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
