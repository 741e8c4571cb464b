//! HTML 렌더링 -- 병합된 블록 레코드를 `<li>` 조각으로 변환합니다.
//!
//! `{{ name }}` 태그만 지원하는 최소 템플릿 엔진입니다. 템플릿은 한 번 파싱되어
//! 리터럴/필드 세그먼트 목록으로 저장되며, 레코드마다 재사용됩니다.
//! 필드 값은 이스케이프하지 않습니다.

use std::fmt::Write as _;

use blockcmp_core::types::Record;

use crate::error::LogPipelineError;

/// 블록 하나를 표시하는 기본 템플릿
pub const BLOCK_TEMPLATE: &str = r#"
    <li>
        <dl>
            <dt class="time">time
            <dd class="time">{{time}}

            <dt class="hash">hash
            <dd class="hash">{{hash}}

            <dt class="transactions">transactions
            <dd class="transactions">{{txcount}}

            <dt class="inputs">inputs
            <dd class="inputs">{{txincount}}
        </dl>
        <table>
            <tr>
                <td style="border-color:green;">{{blocktime}} ms
            <tr>
                <td style="border-color:green;">{{bc_dur}} ms
            <tr>
                <td style="border-color:green;">{{bc_cdur}} ms
        </table>
    </li>
"#;

const TAG_OPEN: &str = "{{";
const TAG_CLOSE: &str = "}}";

/// 템플릿 세그먼트
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// 파싱된 템플릿
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// 템플릿 문자열을 파싱합니다.
    ///
    /// # Errors
    /// 닫히지 않은 `{{` 또는 빈 태그는 [`LogPipelineError::Template`]을 반환합니다.
    pub fn parse(source: &str) -> Result<Self, LogPipelineError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find(TAG_OPEN) {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_owned()));
            }

            let after_open = &rest[open + TAG_OPEN.len()..];
            let Some(close) = after_open.find(TAG_CLOSE) else {
                return Err(LogPipelineError::Template {
                    offset: offset + open,
                    reason: "unterminated tag".to_owned(),
                });
            };

            let name = after_open[..close].trim();
            if name.is_empty() {
                return Err(LogPipelineError::Template {
                    offset: offset + open,
                    reason: "empty tag".to_owned(),
                });
            }
            segments.push(Segment::Field(name.to_owned()));

            let consumed = open + TAG_OPEN.len() + close + TAG_CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }

        Ok(Self { segments })
    }

    /// 템플릿이 참조하는 필드 이름
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// 레코드로 템플릿을 채웁니다. 레코드에 없는 필드는 빈 문자열이 됩니다.
    pub fn render(&self, record: &Record) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    if let Some(value) = record.get(name) {
                        // String에 쓰기는 실패하지 않음
                        let _ = write!(out, "{value}");
                    }
                }
            }
        }
        out
    }
}

/// 블록 HTML 렌더러
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    template: Template,
}

impl HtmlRenderer {
    /// 기본 블록 템플릿으로 렌더러를 생성합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Self::with_template(BLOCK_TEMPLATE)
    }

    /// 사용자 템플릿으로 렌더러를 생성합니다.
    pub fn with_template(source: &str) -> Result<Self, LogPipelineError> {
        Ok(Self {
            template: Template::parse(source)?,
        })
    }

    /// 블록 하나를 `<li>` 조각으로 렌더링합니다.
    pub fn render_block(&self, record: &Record) -> String {
        self.template.render(record)
    }

    /// 블록 목록을 `<ul class='graph'>`로 감싸 렌더링합니다.
    pub fn render_document<'r>(&self, records: impl IntoIterator<Item = &'r Record>) -> String {
        let mut out = String::from("<ul class='graph'>\n");
        for record in records {
            out.push_str(&self.render_block(record));
            out.push('\n');
        }
        out.push_str("</ul>\n");
        out
    }
}
