//! Field extraction over one parsed document.
//!
//! Four independent sub-extractors (price, stock, description, images) run
//! concurrently and their outputs are merged into a candidate record. Each
//! rule is a pure function over [`Document`], testable against literal HTML
//! fixtures; within a field, the first rule that yields non-trivial content
//! wins and later rules are not consulted.
//!
//! Unlike the fetch stage, a sub-extractor failure is tolerated: the field
//! is left absent, a warning is logged, and the job carries on.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::document::Document;
use crate::record::{MAX_DESCRIPTION_LEN, MAX_IMAGES, MAX_PROMOTION_LEN, ProductRecord};

/// Plausible magnitude band for price tokens; values outside are noise.
const PRICE_MIN: f64 = 100.0;
const PRICE_MAX: f64 = 10_000.0;

/// Stock quantities above this are treated as not-found, never clipped.
const STOCK_MAX: u32 = 1000;

/// Minimum length for a description fragment to count as non-trivial.
const MIN_DESCRIPTION_LEN: usize = 10;

// Price tokens carry a currency marker: a leading peso sign or a trailing
// MX/MXN. Commas are stripped from the text before matching.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*([0-9]+(?:\.[0-9]+)?)|([0-9]+(?:\.[0-9]+)?)\s*MXN?\b")
        .expect("price regex")
});

static DISCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""descuento"\s*:\s*([0-9]+(?:\.[0-9]+)?)"#).expect("discount regex"));

static PROMO_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""descripcion"\s*:\s*"([^"]+)""#).expect("promo regex"));

static STOCK_JSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""disponibles"\s*:\s*([0-9]+)"#).expect("stock json regex"));

static STOCK_TEXT_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)disponibles:\s*(\d+)").expect("stock regex"),
        Regex::new(r"(?i)(\d+)\s*disponibles?").expect("stock regex"),
        Regex::new(r"(?i)stock:\s*(\d+)").expect("stock regex"),
    ]
});

static LONG_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""descripcionLarga"\s*:\s*"([^"]*)""#).expect("description regex")
});

static SPEC_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""especificacion"\s*:\s*"([^"]+)""#).expect("spec entry regex"));

/// How many especificaciones entries get folded into the description.
const MAX_SPEC_ENTRIES: usize = 3;

/// Output of the price sub-extractor.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PriceInfo {
    pub original_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub discount_percentage: Option<u8>,
    pub promotion_text: Option<String>,
}

/// The four field extractors the pipeline fans out to. Plain function
/// pointers so a test can swap in a failing extractor.
struct ExtractorSet {
    price: fn(&Document) -> PriceInfo,
    stock: fn(&Document) -> Option<u32>,
    description: fn(&Document) -> Option<String>,
    images: fn(&Document) -> Vec<String>,
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self {
            price: extract_price_info,
            stock: extract_stock,
            description: extract_description,
            images: extract_images,
        }
    }
}

/// Run all sub-extractors concurrently over one document and merge the
/// results. Never fails: a panicking or erroring sub-extractor only leaves
/// its fields absent.
pub async fn extract(document: Arc<Document>, product_id: &str) -> ProductRecord {
    run_extractors(document, product_id, ExtractorSet::default()).await
}

async fn run_extractors(
    document: Arc<Document>,
    product_id: &str,
    extractors: ExtractorSet,
) -> ProductRecord {
    let doc = document.clone();
    let price_fn = extractors.price;
    let price_task = tokio::task::spawn_blocking(move || price_fn(&doc));
    let doc = document.clone();
    let stock_fn = extractors.stock;
    let stock_task = tokio::task::spawn_blocking(move || stock_fn(&doc));
    let doc = document.clone();
    let description_fn = extractors.description;
    let description_task = tokio::task::spawn_blocking(move || description_fn(&doc));
    let doc = document.clone();
    let images_fn = extractors.images;
    let images_task = tokio::task::spawn_blocking(move || images_fn(&doc));

    // Fan-in: wait for all four, no early cancellation of slower extractors.
    let (price, stock, description, images) =
        tokio::join!(price_task, stock_task, description_task, images_task);

    let price = price.unwrap_or_else(|e| {
        tracing::warn!(product_id, error = %e, "Price extraction failed");
        PriceInfo::default()
    });
    let stock = stock.unwrap_or_else(|e| {
        tracing::warn!(product_id, error = %e, "Stock extraction failed");
        None
    });
    let description = description.unwrap_or_else(|e| {
        tracing::warn!(product_id, error = %e, "Description extraction failed");
        None
    });
    let images = images.unwrap_or_else(|e| {
        tracing::warn!(product_id, error = %e, "Image extraction failed");
        Vec::new()
    });

    let mut record = ProductRecord::new(product_id);
    record.original_price = price.original_price;
    record.sale_price = price.sale_price;
    record.discount_percentage = price.discount_percentage;
    record.promotion_text = price.promotion_text;
    record.stock_quantity = stock;
    record.detailed_description = description;
    record.additional_images = images;
    record
}

/// Scan page text for price tokens in the plausible band, deduplicate, and
/// keep only the top two: largest is the original price, second-largest the
/// sale price. A single distinct value is a sale price only. Embedded
/// promotional metadata supplies the discount when present; otherwise the
/// record validator derives it from the two prices.
pub fn extract_price_info(doc: &Document) -> PriceInfo {
    let text = doc.text.replace(',', "");
    let mut candidates: Vec<f64> = Vec::new();
    for caps in PRICE_RE.captures_iter(&text) {
        let token = caps.get(1).or_else(|| caps.get(2));
        if let Some(token) = token {
            if let Ok(value) = token.as_str().parse::<f64>() {
                if (PRICE_MIN..=PRICE_MAX).contains(&value) {
                    candidates.push(value);
                }
            }
        }
    }
    candidates.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    candidates.dedup();

    let mut info = PriceInfo::default();
    match candidates.as_slice() {
        [] => {}
        [only] => info.sale_price = Some(*only),
        // Lower candidates are discarded as noise.
        [top, second, ..] => {
            info.original_price = Some(*top);
            info.sale_price = Some(*second);
        }
    }

    let (discount, promotion) = embedded_promotion(doc);
    info.discount_percentage = discount;
    info.promotion_text = promotion;
    info
}

/// Promotional metadata embedded in the page's product JSON, when present.
fn embedded_promotion(doc: &Document) -> (Option<u8>, Option<String>) {
    // Promotion text only counts inside an explicit promotions block; the
    // generic product blob reuses "descripcion" for the product itself.
    let promo_scope = doc.html.find("promociones").map(|i| &doc.html[i..]);
    let discount_scope =
        promo_scope.or_else(|| doc.html.find("dataProd").map(|i| &doc.html[i..]));

    let discount = discount_scope
        .and_then(|scope| DISCOUNT_RE.captures(scope))
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|pct| *pct > 0.0 && *pct <= 100.0)
        .map(|pct| pct.round() as u8);

    let promotion = promo_scope
        .and_then(|scope| PROMO_TEXT_RE.captures(scope))
        .map(|caps| truncate_chars(unescape_fragment(&caps[1]).trim(), MAX_PROMOTION_LEN))
        .filter(|text| !text.is_empty());

    (discount, promotion)
}

/// Stock quantity: structured fields first, then known phrasings with a
/// sanity bound. Out-of-band values mean not-found, never a clipped number.
pub fn extract_stock(doc: &Document) -> Option<u32> {
    if let Some(caps) = STOCK_JSON_RE.captures(&doc.html) {
        if let Ok(qty) = caps[1].parse::<u32>() {
            return Some(qty);
        }
    }
    if let Some(qty) = quantity_input_max(&doc.html) {
        return Some(qty);
    }

    let lower = doc.text.to_lowercase();
    if ["agotado", "sin stock", "no disponible"]
        .iter()
        .any(|phrase| lower.contains(phrase))
    {
        return Some(0);
    }

    for re in STOCK_TEXT_RES.iter() {
        if let Some(caps) = re.captures(&doc.text) {
            if let Ok(qty) = caps[1].parse::<u32>() {
                if (1..=STOCK_MAX).contains(&qty) {
                    return Some(qty);
                }
            }
        }
    }
    None
}

/// The quantity selector's `max` attribute, when the page renders one.
fn quantity_input_max(html: &str) -> Option<u32> {
    let parsed = Html::parse_document(html);
    let selector = Selector::parse("input.js-quantity").ok()?;
    parsed
        .select(&selector)
        .next()?
        .value()
        .attr("max")?
        .parse()
        .ok()
}

/// Description rules, first non-trivial result wins: embedded long-form
/// JSON field, then the description content region, then page metadata.
pub fn extract_description(doc: &Document) -> Option<String> {
    if let Some(caps) = LONG_DESCRIPTION_RE.captures(&doc.html) {
        let text = unescape_fragment(&caps[1]);
        let text = text.trim();
        if text.chars().count() > MIN_DESCRIPTION_LEN {
            let mut text = text.to_string();
            if let Some(fold) = especificaciones_fold(&doc.html) {
                text.push_str(&fold);
            }
            return Some(truncate_chars(&text, MAX_DESCRIPTION_LEN));
        }
    }

    if let Some(text) = element_text(&doc.html, "div#description") {
        let text = text.trim().to_string();
        if text.chars().count() > MIN_DESCRIPTION_LEN {
            return Some(truncate_chars(&text, MAX_DESCRIPTION_LEN));
        }
    }

    if let Some(content) = meta_description(&doc.html) {
        let content = content.trim();
        if !content.is_empty() {
            return Some(truncate_chars(content, MAX_DESCRIPTION_LEN));
        }
    }

    None
}

/// The embedded `especificaciones` entries, folded into a single sentence
/// appended to the long-form description. Only the entries inside the
/// array are considered, and only the first [`MAX_SPEC_ENTRIES`].
fn especificaciones_fold(html: &str) -> Option<String> {
    let start = html.find("\"especificaciones\"")?;
    let scope = &html[start..];
    let scope = &scope[..scope.find(']').unwrap_or(scope.len())];

    let entries: Vec<String> = SPEC_ENTRY_RE
        .captures_iter(scope)
        .map(|caps| unescape_fragment(caps[1].trim()))
        .filter(|entry| !entry.is_empty())
        .take(MAX_SPEC_ENTRIES)
        .collect();

    if entries.is_empty() {
        return None;
    }
    Some(format!(" Especificaciones: {}.", entries.join(" • ")))
}

fn element_text(html: &str, selector: &str) -> Option<String> {
    let parsed = Html::parse_document(html);
    let selector = Selector::parse(selector).ok()?;
    let element = parsed.select(&selector).next()?;
    Some(element.text().collect::<Vec<_>>().join(" "))
}

fn meta_description(html: &str) -> Option<String> {
    let parsed = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
    parsed
        .select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(str::to_string)
}

/// Candidate product images: known lazy-load attributes, product/CDN
/// heuristics, relative links resolved against the page URL, non-product
/// assets excluded, deduplicated, capped at [`MAX_IMAGES`].
pub fn extract_images(doc: &Document) -> Vec<String> {
    let base = Url::parse(&doc.url).ok();
    let parsed = Html::parse_document(&doc.html);
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut images = Vec::new();
    for img in parsed.select(&selector) {
        let src = ["src", "data-src", "data-lazy-src", "data-original"]
            .iter()
            .find_map(|attr| img.value().attr(attr));
        let Some(src) = src else { continue };
        if !looks_like_product_image(src) {
            continue;
        }
        let Some(absolute) = absolutize(src, base.as_ref()) else {
            continue;
        };
        if seen.insert(absolute.clone()) {
            images.push(absolute);
            if images.len() >= MAX_IMAGES {
                break;
            }
        }
    }
    images
}

fn looks_like_product_image(src: &str) -> bool {
    const EXCLUDED: [&str; 13] = [
        "logo",
        "banner",
        "icon",
        "sprite",
        "loading",
        "placeholder",
        "thumb",
        "favicon",
        "header",
        "footer",
        "menu",
        "nav",
        "social",
    ];
    const PRODUCT_HINTS: [&str; 5] = ["product", "producto", "ecommerce", "cdn", "catalog"];

    let src = src.to_lowercase();
    if EXCLUDED.iter().any(|hint| src.contains(hint)) {
        return false;
    }
    PRODUCT_HINTS.iter().any(|hint| src.contains(hint))
}

fn absolutize(src: &str, base: Option<&Url>) -> Option<String> {
    match base {
        Some(base) => {
            let joined = base.join(src).ok()?;
            matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
        }
        None => src.starts_with("http").then(|| src.to_string()),
    }
}

fn unescape_fragment(raw: &str) -> String {
    raw.replace("\\\"", "\"")
        .replace("\\n", " ")
        .replace("\\r", "")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Document {
        Document::parse(
            "https://tienda.example.com/producto/123",
            format!("<html><head><title>Producto</title></head><body>{body}</body></html>"),
        )
    }

    // -----------------------------------------------------------------
    // Price
    // -----------------------------------------------------------------

    #[test]
    fn two_distinct_prices_become_original_and_sale() {
        let doc = doc("<p>Antes $739.50 MXN</p><p>Ahora $628.58 MXN</p>");
        let info = extract_price_info(&doc);
        assert_eq!(info.original_price, Some(739.50));
        assert_eq!(info.sale_price, Some(628.58));
    }

    #[test]
    fn single_price_is_sale_only() {
        let doc = doc("<p>$1,299.00 MXN</p>");
        let info = extract_price_info(&doc);
        assert_eq!(info.original_price, None);
        assert_eq!(info.sale_price, Some(1299.0));
    }

    #[test]
    fn duplicate_prices_collapse() {
        let doc = doc("<p>$500.00 MXN</p><span>$500.00 MXN</span>");
        let info = extract_price_info(&doc);
        assert_eq!(info.original_price, None);
        assert_eq!(info.sale_price, Some(500.0));
    }

    #[test]
    fn more_than_two_candidates_keeps_top_two() {
        let doc = doc("<p>$900 MXN</p><p>$750 MXN</p><p>$120 MXN</p>");
        let info = extract_price_info(&doc);
        assert_eq!(info.original_price, Some(900.0));
        assert_eq!(info.sale_price, Some(750.0));
    }

    #[test]
    fn out_of_band_values_are_noise() {
        let doc = doc("<p>$5.00 MXN</p><p>$99999.00 MXN</p>");
        let info = extract_price_info(&doc);
        assert_eq!(info, PriceInfo::default());
    }

    #[test]
    fn bare_numbers_without_currency_marker_are_ignored() {
        let doc = doc("<p>Modelo 4570 lote 20250</p>");
        let info = extract_price_info(&doc);
        assert_eq!(info.sale_price, None);
    }

    #[test]
    fn embedded_promotion_supplies_discount_and_text() {
        let doc = doc(
            r#"<p>$628.58 MXN</p>
               <script>let dataProd = {"precioConIVA": 628.58,
                 "promociones": {"descuentosUnicos": [
                   {"descripcion": "Oferta de temporada", "descuento": 15}]}};</script>"#,
        );
        let info = extract_price_info(&doc);
        assert_eq!(info.discount_percentage, Some(15));
        assert_eq!(info.promotion_text.as_deref(), Some("Oferta de temporada"));
    }

    #[test]
    fn generic_data_blob_discount_without_promotions_block() {
        let doc = doc(r#"<script>let dataProd = {"precio": 500, "descuento": 20};</script>"#);
        let info = extract_price_info(&doc);
        assert_eq!(info.discount_percentage, Some(20));
        assert_eq!(info.promotion_text, None);
    }

    // -----------------------------------------------------------------
    // Stock
    // -----------------------------------------------------------------

    #[test]
    fn structured_json_stock_wins() {
        let doc = doc(
            r#"<script>let dataProd = {"disponibles": 42};</script>
               <p>3 disponibles</p>"#,
        );
        assert_eq!(extract_stock(&doc), Some(42));
    }

    #[test]
    fn quantity_input_max_attribute() {
        let doc = doc(r#"<input class="js-quantity" type="number" max="7">"#);
        assert_eq!(extract_stock(&doc), Some(7));
    }

    #[test]
    fn out_of_stock_phrases_mean_zero() {
        assert_eq!(extract_stock(&doc("<p>Producto agotado</p>")), Some(0));
        assert_eq!(extract_stock(&doc("<p>Sin stock</p>")), Some(0));
    }

    #[test]
    fn stock_phrasings_are_matched() {
        assert_eq!(extract_stock(&doc("<p>Disponibles: 12</p>")), Some(12));
        assert_eq!(extract_stock(&doc("<p>8 disponibles</p>")), Some(8));
        assert_eq!(extract_stock(&doc("<p>Stock: 3</p>")), Some(3));
    }

    #[test]
    fn out_of_band_stock_is_not_found() {
        assert_eq!(extract_stock(&doc("<p>Disponibles: 5000</p>")), None);
    }

    // -----------------------------------------------------------------
    // Description
    // -----------------------------------------------------------------

    #[test]
    fn embedded_long_description_wins() {
        let doc = doc(
            r#"<script>let dataProd = {"descripcionLarga": "Tiras reactivas para monitoreo continuo de glucosa."};</script>
               <div id="description">Texto corto del div</div>"#,
        );
        let desc = extract_description(&doc).unwrap();
        assert!(desc.starts_with("Tiras reactivas"));
    }

    #[test]
    fn description_div_is_the_fallback() {
        let doc = doc(r#"<div id="description">Medidor de glucosa con pantalla grande.</div>"#);
        let desc = extract_description(&doc).unwrap();
        assert!(desc.contains("pantalla grande"));
    }

    #[test]
    fn page_metadata_is_the_last_resort() {
        let html = r#"<html><head>
            <meta name="description" content="Lancetas estériles de un solo uso.">
            <title>Producto</title></head><body></body></html>"#;
        let doc = Document::parse("https://tienda.example.com/p/1", html.to_string());
        let desc = extract_description(&doc).unwrap();
        assert!(desc.contains("Lancetas"));
    }

    #[test]
    fn trivial_fragments_do_not_win() {
        let doc = doc(r#"<div id="description">corto</div>"#);
        assert_eq!(extract_description(&doc), None);
    }

    #[test]
    fn especificaciones_are_folded_into_the_description() {
        let doc = doc(
            r#"<script>let dataProd = {
                 "descripcionLarga": "Tiras reactivas para monitoreo continuo de glucosa.",
                 "especificaciones": [
                   {"especificacion": "50 tiras por frasco"},
                   {"especificacion": "Sin codificación"},
                   {"especificacion": "Muestra de 0.6 µL"},
                   {"especificacion": "Resultado en 4 segundos"}]};</script>"#,
        );
        let desc = extract_description(&doc).unwrap();
        assert!(desc.starts_with("Tiras reactivas"));
        assert!(desc.contains(
            "Especificaciones: 50 tiras por frasco • Sin codificación • Muestra de 0.6 µL."
        ));
        // Capped at three entries.
        assert!(!desc.contains("Resultado en 4 segundos"));
    }

    #[test]
    fn especificaciones_alone_do_not_make_a_description() {
        let doc = doc(
            r#"<script>let dataProd = {"especificaciones": [
                 {"especificacion": "50 tiras por frasco"}]};</script>"#,
        );
        assert_eq!(extract_description(&doc), None);
    }

    #[test]
    fn escaped_json_description_is_unescaped() {
        // Raw string: the HTML carries literal \n and \r escape sequences.
        let doc = doc(
            r#"<script>let dataProd = {"descripcionLarga": "Línea uno.\nLínea dos con más detalle.\r"};</script>"#,
        );
        let desc = extract_description(&doc).unwrap();
        assert!(!desc.contains("\\n"));
        assert!(!desc.contains('\r'));
        assert!(desc.contains("Línea uno."));
        assert!(desc.contains("Línea dos"));
    }

    // -----------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------

    #[test]
    fn images_are_absolutized_and_deduplicated() {
        let doc = doc(
            r#"<img src="/media/product/123-front.jpg">
               <img data-src="//cdn.example.com/product/123-side.jpg">
               <img src="/media/product/123-front.jpg">"#,
        );
        let images = extract_images(&doc);
        assert_eq!(
            images,
            vec![
                "https://tienda.example.com/media/product/123-front.jpg".to_string(),
                "https://cdn.example.com/product/123-side.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn non_product_assets_are_excluded() {
        let doc = doc(
            r#"<img src="/assets/logo.png">
               <img src="/product/123-thumb.jpg">
               <img src="/icons/cart.svg">
               <img src="/product/123.jpg">"#,
        );
        let images = extract_images(&doc);
        assert_eq!(
            images,
            vec!["https://tienda.example.com/product/123.jpg".to_string()]
        );
    }

    #[test]
    fn image_list_is_capped() {
        let tags: String = (0..25)
            .map(|i| format!(r#"<img src="/product/{i}.jpg">"#))
            .collect();
        let doc = doc(&tags);
        assert_eq!(extract_images(&doc).len(), MAX_IMAGES);
    }

    // -----------------------------------------------------------------
    // Merge / partial-failure tolerance
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn merge_populates_all_extracted_fields() {
        let doc = Arc::new(doc(
            r#"<p>Antes $739.50 MXN ahora $628.58 MXN</p>
               <p>Disponibles: 12</p>
               <div id="description">Medidor de glucosa con memoria de resultados.</div>
               <img src="/product/123.jpg">"#,
        ));
        let record = extract(doc, "123").await;
        assert_eq!(record.product_id, "123");
        assert_eq!(record.sku.as_deref(), Some("123"));
        assert_eq!(record.original_price, Some(739.50));
        assert_eq!(record.sale_price, Some(628.58));
        assert_eq!(record.stock_quantity, Some(12));
        assert!(record.detailed_description.is_some());
        assert_eq!(record.additional_images.len(), 1);
    }

    #[tokio::test]
    async fn panicking_image_extractor_only_loses_its_own_field() {
        let doc = Arc::new(doc(
            r#"<p>Antes $739.50 MXN ahora $628.58 MXN</p>
               <p>Disponibles: 12</p>
               <div id="description">Medidor de glucosa con memoria de resultados.</div>
               <img src="/product/123.jpg">"#,
        ));
        let extractors = ExtractorSet {
            images: |_| panic!("selector blew up"),
            ..ExtractorSet::default()
        };

        let record = run_extractors(doc, "123", extractors).await;
        assert_eq!(record.original_price, Some(739.50));
        assert_eq!(record.sale_price, Some(628.58));
        assert_eq!(record.stock_quantity, Some(12));
        assert!(record.detailed_description.is_some());
        assert!(record.additional_images.is_empty());
    }

    #[tokio::test]
    async fn panicking_price_extractor_leaves_prices_absent() {
        let doc = Arc::new(doc("<p>Disponibles: 12</p>"));
        let extractors = ExtractorSet {
            price: |_| panic!("price regex blew up"),
            ..ExtractorSet::default()
        };

        let record = run_extractors(doc, "123", extractors).await;
        assert_eq!(record.original_price, None);
        assert_eq!(record.sale_price, None);
        assert_eq!(record.stock_quantity, Some(12));
    }

    #[tokio::test]
    async fn missing_fields_stay_absent_without_failing() {
        // No prices, no stock, no description, no usable images: the call
        // still returns a record rather than an error.
        let doc = Arc::new(doc(r#"<img src="/assets/logo.png"><p>hola</p>"#));
        let record = extract(doc, "9").await;
        assert_eq!(record.original_price, None);
        assert_eq!(record.sale_price, None);
        assert_eq!(record.stock_quantity, None);
        assert_eq!(record.detailed_description, None);
        assert!(record.additional_images.is_empty());
    }
}
