//! 结构化输出恢复：从模型的自由文本回复中取回 JSON
//!
//! 模型被要求「只返回 JSON」，但经常包一层 Markdown 代码块、前后加解释文字，
//! 或在字符串里留下未转义的换行。parse 按顺序尝试三种修复，第一种成功即返回：
//!
//! 1. 去掉代码块标记后直接解析
//! 2. 截取第一个 `{`/`[` 到最后一个 `}`/`]` 之间的片段再解析
//! 3. 在该片段内把字符串中的裸换行转义后再解析
//!
//! 不做通用 JSON 修复；纯函数，无副作用。

use serde_json::Value;

use crate::core::ParseError;

const FENCE_JSON: &str = "```json";
const FENCE: &str = "```";

/// 从模型回复中恢复一个 JSON 值（对象或数组）
pub fn parse(raw: &str) -> Result<Value, ParseError> {
    let cleaned = strip_fences(raw);

    let message = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };
    tracing::debug!(
        error = %ParseError::DirectParseFailed(message.clone()),
        "trying bracket extraction"
    );

    let Some(candidate) = extract_candidate(&cleaned) else {
        tracing::warn!(len = cleaned.len(), "no JSON brackets found in model response");
        return Err(ParseError::NoValidJson {
            message,
            candidate_len: cleaned.len(),
        });
    };

    let extraction_err = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => return Ok(value),
        Err(e) => ParseError::ExtractionFailed(e.to_string()),
    };
    tracing::debug!(error = %extraction_err, "escaping bare newlines");

    let repaired = escape_bare_newlines(candidate);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(
                error = %e,
                candidate_len = candidate.len(),
                "all JSON recovery attempts failed"
            );
            Err(ParseError::NoValidJson {
                message,
                candidate_len: candidate.len(),
            })
        }
    }
}

/// 去掉所有 ```json 与 ``` 标记及首尾空白
fn strip_fences(raw: &str) -> String {
    raw.replace(FENCE_JSON, "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

/// 第一个开括号到最后一个闭括号（含两端）；找不到或顺序颠倒时返回 None
fn extract_candidate(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let end = text.rfind(['}', ']'])?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// 把字符串字面量内部未被反斜杠转义的 `\n`、`\r` 替换为转义序列
///
/// 字符串外的换行是合法空白，保持原样。
fn escape_bare_newlines(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for c in candidate.chars() {
        if escaped {
            out.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = !in_string;
                out.push(c);
            }
            '\n' if in_string => out.push_str("\\n"),
            '\r' if in_string => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
