//! マッチングサービス応答の正規化
//!
//! サービスの応答は形が一定しないため、まず既知の形のタグ付きユニオン
//! (`RawMatchResponse`) に分類し、そこから一様な `ResultItem` 列へ変換する。
//!
//! ## 受け付ける形
//! 1. `{ status, results: [ { label, conf, box, matches: [...] } ] }` （検出ごとのマッチ）
//! 2. `[ { id, title, imageUrl, price, link } ]` または
//!    `{ results: [ { imageUrl, price, buyLink } ] }` （旧形式のフラットな配列）
//! 3. `{ status: "error", message }` （HTTP 200で返るサービス側エラー）
//!
//! それ以外はすべて `Unrecognized` とし、空の結果に落とす。正規化は決して失敗しない。

use serde_json::{Map, Value};

use crate::types::ResultItem;

/// 検出を示すキー（いずれかがあれば検出オブジェクトとみなす）
const DETECTION_KEYS: &[&str] = &["matches", "label", "conf", "box"];

/// 結果アイテムを示すキー（いずれかがあればフラットな結果とみなす）
const ITEM_KEYS: &[&str] = &["id", "title", "name", "imageUrl", "image_url", "link", "buyLink", "price"];

/// タイトルが得られない場合の既定値
const DEFAULT_TITLE: &str = "Match";

/// 検出ラベルがない場合のID接頭辞
const DEFAULT_ID_PREFIX: &str = "match";

/// 分類済みのサービス応答
#[derive(Debug, Clone, PartialEq)]
pub enum RawMatchResponse {
    /// 検出ごとにマッチを持つ形式
    Detections(Vec<Detection>),
    /// すでにResultItem形のフラットな配列
    Flat(Vec<ResultItem>),
    /// サービスが報告したエラー
    ServiceError { message: String },
    /// 未知の形
    Unrecognized,
}

/// 画像内で検出された物体
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub label: Option<String>,
    pub confidence: Option<f64>,
    /// [x1, y1, x2, y2]
    pub bounding_box: Option<[f64; 4]>,
    pub matches: Vec<MatchEntry>,
}

/// 検出に対するカタログ上の類似アイテム
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchEntry {
    pub score: Option<f64>,
    /// サーバー側のパス（クライアントには公開しない）
    pub image_path: Option<String>,
    /// サーバー側の絶対パス（クライアントには公開しない）
    pub abs_path: Option<String>,
    pub price: Option<String>,
    pub external_url: Option<String>,
    pub pinterest_url: Option<String>,
    pub meta: MatchMeta,
}

/// マッチのカタログメタデータ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchMeta {
    pub id: Option<String>,
    pub style: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub external_url: Option<String>,
    pub pinterest_url: Option<String>,
}

impl RawMatchResponse {
    /// 応答JSONを既知の形に分類
    ///
    /// 分類は失敗しない。どの形にも当てはまらなければ `Unrecognized`
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Array(items) => classify_array(items),
            Value::Object(map) => classify_object(map),
            _ => Self::Unrecognized,
        }
    }

    /// 一様な結果列へ変換
    ///
    /// 検出の到着順、検出内のマッチの到着順を保つ
    pub fn into_items(self) -> Vec<ResultItem> {
        match self {
            Self::Detections(detections) => flatten_detections(&detections),
            Self::Flat(items) => items,
            Self::ServiceError { .. } | Self::Unrecognized => Vec::new(),
        }
    }
}

/// 応答JSONを正規化
///
/// # Examples
/// ```
/// use furniture_match_common::normalize;
/// use serde_json::json;
///
/// let raw = json!({"results": [{"label": "chair", "matches": [{"score": 0.9}]}]});
/// let items = normalize(&raw);
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].title(), "chair");
/// ```
pub fn normalize(value: &Value) -> Vec<ResultItem> {
    RawMatchResponse::classify(value).into_items()
}

fn classify_object(map: &Map<String, Value>) -> RawMatchResponse {
    if map.get("status").and_then(Value::as_str) == Some("error") {
        let message = get_string(map, "message").unwrap_or_else(|| "unknown service error".to_string());
        return RawMatchResponse::ServiceError { message };
    }

    let Some(results) = map.get("results").and_then(Value::as_array) else {
        return RawMatchResponse::Unrecognized;
    };

    if results.is_empty() {
        return RawMatchResponse::Detections(Vec::new());
    }

    classify_array(results)
}

/// 配列を検出列・フラットな結果列・未知のいずれかに分類
///
/// 検出キーを持つ要素が一つでもあれば検出列。次に結果アイテムのキーを持つ
/// 要素があればフラットな結果列（キーを持たない要素は捨てる）
fn classify_array(values: &[Value]) -> RawMatchResponse {
    let objects: Vec<&Map<String, Value>> = values.iter().filter_map(Value::as_object).collect();

    if objects.iter().any(|obj| has_any_key(obj, DETECTION_KEYS)) {
        let detections = objects.into_iter().map(parse_detection).collect();
        return RawMatchResponse::Detections(detections);
    }

    let records: Vec<&Map<String, Value>> = objects
        .into_iter()
        .filter(|obj| has_any_key(obj, ITEM_KEYS))
        .collect();
    if records.is_empty() && !values.is_empty() {
        return RawMatchResponse::Unrecognized;
    }

    RawMatchResponse::Flat(parse_flat_items(&records))
}

fn has_any_key(map: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|key| map.contains_key(*key))
}

fn parse_detection(map: &Map<String, Value>) -> Detection {
    let matches = map
        .get("matches")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(parse_match)
                .collect()
        })
        .unwrap_or_default();

    Detection {
        label: get_string(map, "label"),
        confidence: map.get("conf").and_then(Value::as_f64),
        bounding_box: parse_box(map.get("box")),
        matches,
    }
}

fn parse_box(value: Option<&Value>) -> Option<[f64; 4]> {
    let coords: Vec<f64> = value?.as_array()?.iter().filter_map(Value::as_f64).collect();
    coords.try_into().ok()
}

fn parse_match(map: &Map<String, Value>) -> MatchEntry {
    let meta = map
        .get("meta")
        .and_then(Value::as_object)
        .map(parse_meta)
        .unwrap_or_default();

    MatchEntry {
        score: map.get("score").and_then(Value::as_f64),
        image_path: get_string(map, "image_path"),
        abs_path: get_string(map, "abs_path"),
        price: get_price(map, "price"),
        external_url: get_string(map, "external_url"),
        pinterest_url: get_string(map, "pinterest_url"),
        meta,
    }
}

fn parse_meta(map: &Map<String, Value>) -> MatchMeta {
    MatchMeta {
        id: get_id(map, "id"),
        style: get_string(map, "style"),
        category: get_string(map, "category"),
        image_url: get_string(map, "image_url"),
        price: get_price(map, "price"),
        external_url: get_string(map, "external_url"),
        pinterest_url: get_string(map, "pinterest_url"),
    }
}

fn flatten_detections(detections: &[Detection]) -> Vec<ResultItem> {
    let mut items = Vec::new();

    for detection in detections {
        for (index, entry) in detection.matches.iter().enumerate() {
            items.push(match_to_item(detection, entry, index));
        }
    }

    items
}

fn match_to_item(detection: &Detection, entry: &MatchEntry, index: usize) -> ResultItem {
    let meta = &entry.meta;

    let id = meta.id.clone().unwrap_or_else(|| {
        let prefix = detection.label.as_deref().unwrap_or(DEFAULT_ID_PREFIX);
        format!("{}-{}", prefix, index)
    });

    let title = meta
        .style
        .as_ref()
        .or(meta.category.as_ref())
        .or(detection.label.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    // image_path / abs_path はサーバーローカルのパスなので使わない
    let image_url = meta.image_url.clone();

    let price = meta.price.clone().or_else(|| entry.price.clone());

    let link = meta
        .external_url
        .as_ref()
        .or(meta.pinterest_url.as_ref())
        .or(entry.external_url.as_ref())
        .or(entry.pinterest_url.as_ref())
        .cloned();

    ResultItem {
        id,
        title,
        image_url,
        price,
        link,
        score: entry.score,
    }
}

fn parse_flat_items(records: &[&Map<String, Value>]) -> Vec<ResultItem> {
    records
        .iter()
        .enumerate()
        .map(|(index, map)| ResultItem {
            id: get_id(map, "id").unwrap_or_else(|| format!("item-{}", index)),
            title: get_string(map, "title")
                .or_else(|| get_string(map, "name"))
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            image_url: get_string(map, "imageUrl").or_else(|| get_string(map, "image_url")),
            price: get_price(map, "price"),
            link: get_string(map, "link").or_else(|| get_string(map, "buyLink")),
            score: map.get("score").and_then(Value::as_f64),
        })
        .collect()
}

/// 空でない文字列のみ取得
fn get_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 文字列または数値のIDを取得
fn get_id(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// 価格は文字列ならそのまま、数値なら文字列化
fn get_price(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
