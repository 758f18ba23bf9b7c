//! JS 片段生成
//!
//! 每个片段都是一个立即执行函数，返回 `{ ok, value, reason }`：
//! - 先按框架路径找到目标文档（遗留系统使用 `<frame>` 嵌套）
//! - 再按定位方式找到元素
//! - 最后执行动作体

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{Locator, Readiness};

/// 元素或框架不存在
pub const REASON_MISSING: &str = "missing";
/// 框架路径中断
pub const REASON_NO_FRAME: &str = "no-frame";
/// 元素存在但未满足条件
pub const REASON_NOT_READY: &str = "not-ready";
/// 下拉框没有该选项
pub const REASON_NO_OPTION: &str = "no-option";

/// 片段的返回值
#[derive(Debug, Clone, Deserialize)]
pub struct JsReply {
    pub ok: bool,
    #[serde(default)]
    pub value: JsonValue,
    #[serde(default)]
    pub reason: Option<String>,
}

impl JsReply {
    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or(REASON_MISSING)
    }
}

fn js_string(value: &str) -> String {
    // serde_json 对 &str 的序列化不会失败
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// 按框架路径得到 `doc`，路径中断时直接返回
fn document_prelude(frame_path: &[usize]) -> String {
    let path = frame_path
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"let doc = document;
        for (const i of [{path}]) {{
            const frames = doc.querySelectorAll('frame, iframe');
            const fr = frames[i];
            if (!fr || !fr.contentDocument) {{
                return {{ ok: false, reason: '{no_frame}' }};
            }}
            doc = fr.contentDocument;
        }}"#,
        path = path,
        no_frame = REASON_NO_FRAME,
    )
}

/// 在 `doc` 上求值得到元素或 null 的表达式
pub fn locator_expr(locator: &Locator) -> String {
    match locator {
        Locator::Id(id) => format!("doc.getElementById({})", js_string(id)),
        Locator::Name(name) => format!(
            "(doc.getElementsByName({})[0] || null)",
            js_string(name)
        ),
        Locator::XPath(path) => format!(
            "doc.evaluate({}, doc, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            js_string(path)
        ),
        Locator::LinkTitle(title) => format!(
            "(Array.from(doc.getElementsByTagName('a')).find(a => a.getAttribute('title') === {}) || null)",
            js_string(title)
        ),
        Locator::LinkText(text) => format!(
            "(Array.from(doc.getElementsByTagName('a')).find(a => (a.textContent || '').trim() === {}) || null)",
            js_string(text)
        ),
    }
}

/// 对 `el` 判断就绪条件的表达式
pub fn readiness_expr(condition: &Readiness) -> String {
    const VISIBLE: &str = "(el.getClientRects().length > 0)";
    match condition {
        Readiness::Present => "true".to_string(),
        Readiness::Visible => VISIBLE.to_string(),
        Readiness::Clickable => format!("({} && !el.disabled)", VISIBLE),
        Readiness::OptionSelected => "(el.selectedIndex !== undefined && el.selectedIndex >= 0)".to_string(),
        Readiness::TextPresent(text) => format!(
            "((el.textContent || '').includes({}))",
            js_string(text)
        ),
        Readiness::FrameReady => "(!!el.contentDocument && el.contentDocument.readyState === 'complete')".to_string(),
    }
}

/// 探测元素是否满足条件
pub fn probe(frame_path: &[usize], locator: &Locator, condition: &Readiness) -> String {
    format!(
        r#"(() => {{
        {prelude}
        const el = {locator};
        if (!el) {{ return {{ ok: false, reason: '{missing}' }}; }}
        if (!{ready}) {{ return {{ ok: false, reason: '{not_ready}' }}; }}
        return {{ ok: true, value: null }};
    }})()"#,
        prelude = document_prelude(frame_path),
        locator = locator_expr(locator),
        ready = readiness_expr(condition),
        missing = REASON_MISSING,
        not_ready = REASON_NOT_READY,
    )
}

/// 对元素执行动作体；动作体可以使用 `el` 与 `doc`，返回值放入 `value`
pub fn action(frame_path: &[usize], locator: &Locator, body: &str) -> String {
    format!(
        r#"(() => {{
        {prelude}
        const el = {locator};
        if (!el) {{ return {{ ok: false, reason: '{missing}' }}; }}
        {body}
    }})()"#,
        prelude = document_prelude(frame_path),
        locator = locator_expr(locator),
        body = body,
        missing = REASON_MISSING,
    )
}

/// 检查当前文档是否有第 `index` 个子框架
pub fn frame_exists(frame_path: &[usize], index: usize) -> String {
    format!(
        r#"(() => {{
        {prelude}
        const fr = doc.querySelectorAll('frame, iframe')[{index}];
        return {{ ok: !!(fr && fr.contentDocument), value: null, reason: '{no_frame}' }};
    }})()"#,
        prelude = document_prelude(frame_path),
        index = index,
        no_frame = REASON_NO_FRAME,
    )
}

pub const READ_TEXT: &str =
    "return { ok: true, value: ((el.innerText !== undefined ? el.innerText : el.textContent) || '').trim() };";

pub fn read_attribute(name: &str) -> String {
    format!(
        r#"const name = {name};
        if (name === 'value' && 'value' in el) {{ return {{ ok: true, value: String(el.value) }}; }}
        return {{ ok: true, value: el.getAttribute(name) }};"#,
        name = js_string(name)
    )
}

pub const LIST_OPTIONS: &str =
    "return { ok: true, value: Array.from(el.options || []).map(o => ({ value: o.value, text: (o.text || '').trim() })) };";

pub const CLICK: &str = "el.click(); return { ok: true, value: null };";

pub fn select_option(value: &str) -> String {
    format!(
        r#"const v = {value};
        if (!Array.from(el.options || []).some(o => o.value === v)) {{
            return {{ ok: false, reason: '{no_option}' }};
        }}
        el.value = v;
        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
        return {{ ok: true, value: null }};"#,
        value = js_string(value),
        no_option = REASON_NO_OPTION,
    )
}

pub const CLEAR: &str = r#"el.value = '';
        el.dispatchEvent(new Event('input', { bubbles: true }));
        return { ok: true, value: null };"#;

pub fn type_text(text: &str) -> String {
    format!(
        r#"el.focus();
        el.value = (el.value || '') + {text};
        el.dispatchEvent(new Event('input', {{ bubbles: true }}));
        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
        return {{ ok: true, value: null }};"#,
        text = js_string(text)
    )
}

pub const SCROLL_INTO_VIEW: &str =
    "el.scrollIntoView({ block: 'center' }); return { ok: true, value: null };";
