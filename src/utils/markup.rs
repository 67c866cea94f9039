//! 标记重写引擎 (Markup Rewriting)
//!
//! 在不可变的 `scraper` 文档树上执行纯函数式遍历，按访问者的决策输出新的
//! XHTML 片段。原文档树不会被修改。

use scraper::ElementRef;

/// 需要自闭合输出的空元素
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// 节点分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading1,
    Heading2,
    Paragraph,
    List,
    LineBreak,
    Other,
}

impl NodeKind {
    pub fn of(el: &ElementRef<'_>) -> Self {
        match el.value().name() {
            "h1" => NodeKind::Heading1,
            "h2" => NodeKind::Heading2,
            "p" => NodeKind::Paragraph,
            "ol" | "ul" => NodeKind::List,
            "br" => NodeKind::LineBreak,
            _ => NodeKind::Other,
        }
    }
}

/// 访问者对单个元素的处理决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// 原样保留并继续遍历子节点
    Keep,
    /// 连同子树一起丢弃
    Drop,
    /// 用给定片段替换整个子树
    Replace(String),
}

/// 元素访问者
pub trait Visitor {
    fn visit(&mut self, kind: NodeKind, el: ElementRef<'_>) -> Rewrite;
}

/// 保留一切的访问者，即普通序列化
struct Identity;

impl Visitor for Identity {
    fn visit(&mut self, _kind: NodeKind, _el: ElementRef<'_>) -> Rewrite {
        Rewrite::Keep
    }
}

/// 序列化元素 (含自身标签)
pub fn serialize(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    render_with(el, &mut Identity, &mut out);
    out
}

/// 以访问者驱动的方式序列化元素
pub fn render_with<V: Visitor>(el: ElementRef<'_>, visitor: &mut V, out: &mut String) {
    match visitor.visit(NodeKind::of(&el), el) {
        Rewrite::Drop => {}
        Rewrite::Replace(fragment) => out.push_str(&fragment),
        Rewrite::Keep => {
            let name = el.value().name();
            out.push('<');
            out.push_str(name);
            for (attr, value) in el.value().attrs() {
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }

            if VOID_ELEMENTS.contains(&name) {
                out.push_str("/>");
                return;
            }
            out.push('>');

            for child in el.children() {
                if let Some(child_el) = ElementRef::wrap(child) {
                    render_with(child_el, visitor, out);
                } else if let Some(text) = child.value().as_text() {
                    escape_into(text, false, out);
                }
            }

            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

/// 渲染容器的直接子元素，每个子元素一个片段
///
/// 容器自身的直接文本节点不输出；被丢弃的子元素不产生片段。
pub fn render_children<V: Visitor>(container: ElementRef<'_>, visitor: &mut V) -> Vec<String> {
    container
        .children()
        .filter_map(ElementRef::wrap)
        .filter_map(|child| {
            let mut out = String::new();
            render_with(child, visitor, &mut out);
            (!out.is_empty()).then_some(out)
        })
        .collect()
}

/// 元素的全部文本 (含后代)
pub fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

/// XML 转义
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, false, &mut out);
    out
}

fn escape_into(text: &str, in_attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
