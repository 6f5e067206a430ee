//! Translator Templates

use crate::tools::extract::{BEGIN_MARKER, END_MARKER};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

const BASIC_BODY: &str = r#"function detectWeb(doc, url) {
    const contentType = attr(doc, 'meta[property="og:type"]', 'content');

    if (contentType === 'article') {
        return 'newspaperArticle';
    }

    return false;
}

function doWeb(doc, url) {
    const translator = Zotero.loadTranslator('web');

    // Embedded Metadata
    translator.setTranslator('951c027d-74ac-47d4-a107-9c3069ab7b48');
    translator.setDocument(doc);

    translator.setHandler('itemDone', (obj, item) => {
        item.itemType = detectWeb(doc, url);

        // Additional config for item object

        item.complete();
    });

    translator.getTranslatorObject((trans) => {
        trans.doWeb(doc, url);
    });
}
"#;

const BASIC_TEST_CASES: &str = r#"var testCases = [
    {
        "type": "web",
        "url": "",
        "items": [
            {

            }
        ]
    }
]"#;

/// A web translator built on Embedded Metadata, with an empty test case.
pub fn basic_translator(translator_id: &str, last_updated: DateTime<Utc>) -> String {
    let header = serde_json::json!({
        "translatorID": translator_id,
        "label": "",
        "creator": "",
        "target": "",
        "minVersion": "3.0",
        "maxVersion": "",
        "priority": 100,
        "inRepository": true,
        "translatorType": 4,
        "browserSupport": "gcsibv",
        "lastUpdated": last_updated.format("%Y-%m-%d %H:%M:%S").to_string(),
    });
    let header = serde_json::to_string_pretty(&header).unwrap_or_default();

    format!("{header}\n\n{BASIC_BODY}\n{BEGIN_MARKER}\n{BASIC_TEST_CASES}\n{END_MARKER}\n")
}

/// The JSON metadata object a translator script starts with, if it parses.
pub fn read_metadata(script: &str) -> Option<Map<String, Value>> {
    let mut values = serde_json::Deserializer::from_str(script).into_iter::<Value>();
    match values.next() {
        Some(Ok(Value::Object(map))) => Some(map),
        _ => None,
    }
}

/// The `label` from a script's metadata header, or an empty string.
pub fn translator_label(script: &str) -> String {
    read_metadata(script)
        .and_then(|m| m.get("label").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}
