use super::command_context;
use crate::chat::{ChannelId, InteractionEvent, MessageId, UserId};
use crate::commands::CommandRegistry;
use crate::config::BotConfig;
use crate::features::liveaquaria::{LiveAquariaClient, parse_product_page, parse_search_results};
use crate::testing::{RecordingSurface, eventually};
use crate::ui::SelectionMenu;
use reqwest::Client;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE: &str = "https://www.liveaquaria.com";

fn card(url: &str, title: &str, price: &str) -> String {
    format!(
        r#"<div class="product">
             <a href="{url}"><div class="product_image"><img class="image" src="https://img.example/{title}.jpg"></div></a>
             <div class="product_details"><h3 class="title"> {title} </h3><div class="price">{price}</div></div>
           </div>"#
    )
}

fn search_page(cards: &[String]) -> String {
    format!("<html><body>{}</body></html>", cards.join("\n"))
}

fn product_page(metadata: &str) -> String {
    format!(
        r#"<html><head><script type="application/ld+json">{metadata}</script></head>
           <body><div class="product-image"><img src="/images/large/tang.jpg"></div></body></html>"#
    )
}

#[test]
fn test_parse_search_results() {
    let html = search_page(&[
        card("https://la.example/p/1", "Blue Tang", "$89.99"),
        r#"<div class="product"><a href="https://la.example/p/2">no title</a></div>"#.to_string(),
        card("https://la.example/p/3", "Yellow Tang", "$129.99"),
        card("https://la.example/p/4", "Hippo Tang", "$79.99"),
    ]);

    let products = parse_search_results(&html, 2).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Blue Tang");
    assert_eq!(products[0].price, "$89.99");
    assert_eq!(products[0].image.as_deref(), Some("https://img.example/Blue Tang.jpg"));

    let products = parse_search_results(&html, 10).unwrap();
    assert_eq!(
        products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        vec!["Blue Tang", "Yellow Tang", "Hippo Tang"]
    );
}

#[test]
fn test_product_entry_summary() {
    let html = search_page(&[card("https://la.example/p/1", "Blue Tang", "$89.99")]);
    let entry = parse_search_results(&html, 10).unwrap().remove(0).into_entry();
    assert_eq!(entry.summary, "Price : `$89.99`");
    assert_eq!(entry.reference, "https://la.example/p/1");
}

#[test]
fn test_product_page_image_fallback() {
    let detail = parse_product_page(
        &product_page(r#"{"name": "Blue Tang", "description": "Reef safe", "image": "https://www.liveaquaria.com/"}"#),
        SITE,
    )
    .unwrap();
    assert_eq!(detail.image.as_deref(), Some("https://www.liveaquaria.com/images/large/tang.jpg"));

    let detail = parse_product_page(
        &product_page(r#"{"name": "Blue Tang", "image": ["https://img.example/a.jpg", "https://img.example/b.jpg"]}"#),
        SITE,
    )
    .unwrap();
    assert_eq!(detail.image.as_deref(), Some("https://img.example/a.jpg"));

    let unit = detail.to_display_unit("https://la.example/p/1");
    assert_eq!(unit.title.as_deref(), Some("Blue Tang"));
    assert_eq!(unit.description.as_deref(), Some("-"));
    assert_eq!(unit.url.as_deref(), Some("https://la.example/p/1"));
}

#[test]
fn test_product_page_without_metadata() {
    assert!(parse_product_page("<html><body></body></html>", SITE).is_err());
}

#[test]
fn test_search_url_encodes_query() {
    let client = LiveAquariaClient::new(Client::new(), &BotConfig::default());
    let url = client.search_url("blue tang").unwrap();
    assert!(url.as_str().ends_with("/api/Search/blue%20tang"));
}

fn config_for(server: &MockServer) -> BotConfig {
    BotConfig {
        liveaquaria_search_url: format!("{}/api/Search/", server.uri()),
        liveaquaria_site_url: server.uri(),
        ..BotConfig::default()
    }
}

#[tokio::test]
async fn test_command_binds_results_and_fetches_detail() {
    let server = MockServer::start().await;
    let product_url = format!("{}/product/tang", server.uri());
    Mock::given(method("GET"))
        .and(path("/api/Search/tang"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(search_page(&[card(&product_url, "Blue Tang", "$89.99")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/tang"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(
            r#"{"name": "Blue Tang", "description": "Reef safe", "image": "https://img.example/tang.jpg"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let surface = Arc::new(RecordingSurface::new());
    let ctx = command_context(config_for(&server), surface.clone());
    CommandRegistry::standard().dispatch(&ctx, "a!la tang").await;

    let opening = surface.sent().remove(0);
    let summary = opening.embed.unwrap();
    assert_eq!(summary.title.as_deref(), Some("Results"));
    assert!(summary.description.unwrap().starts_with(&format!("**1. [Blue Tang]({})**", product_url)));
    let controls = opening.controls.unwrap();
    assert!(controls.find(SelectionMenu::ID).is_some());

    let routed = ctx
        .app
        .sessions
        .route(InteractionEvent {
            channel: ChannelId(3),
            message: MessageId(1),
            user: UserId(8),
            component_id: SelectionMenu::ID.to_string(),
            values: vec![format!("0:{}", product_url)],
        })
        .await;
    assert!(routed);

    eventually(|| !surface.ephemerals().is_empty()).await;
    let (user, detail) = surface.ephemerals().remove(0);
    assert_eq!(user, UserId(8));
    let detail = detail.embed.unwrap();
    assert_eq!(detail.title.as_deref(), Some("Blue Tang"));
    assert_eq!(detail.description.as_deref(), Some("Reef safe"));
    assert_eq!(detail.image.as_deref(), Some("https://img.example/tang.jpg"));
}

#[tokio::test]
async fn test_command_without_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page(&[])))
        .mount(&server)
        .await;

    let surface = Arc::new(RecordingSurface::new());
    let ctx = command_context(config_for(&server), surface.clone());
    CommandRegistry::standard().dispatch(&ctx, "a!liveaquaria clown goby").await;

    let reply = surface.sent().remove(0);
    assert_eq!(reply.reply_to, Some(MessageId(100)));
    assert!(reply.controls.is_none());
    assert_eq!(
        reply.embed.unwrap().description.as_deref(),
        Some("No results were found for the query : clown goby")
    );
}
