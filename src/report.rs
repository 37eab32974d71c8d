use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::period::sum_minutes;
use crate::time_entry::WorkEntry;
use crate::time_format::format_minutes_as_hours;
use crate::view::{entry_rows, EntryRow};

const TITLE: &str = "Work Hours Report";
const FOOTER: &str = "Work Hours Report - All rights reserved.";
const HEADERS: [&str; 5] = ["Date", "Week Number", "Start Time", "End Time", "Total Hours"];

// A4 (pt)
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_X: i64 = 40;
const COLUMN_X: [i64; 5] = [40, 140, 250, 350, 450];
const TITLE_Y: i64 = 800;
const TABLE_TOP_FIRST_PAGE: i64 = 770;
const TABLE_TOP: i64 = 800;
const ROW_HEIGHT: i64 = 18;
const FOOTER_Y: i64 = 30;

/// 帳票に出力する内容。
///
/// 合計時間は集計期間に関係なく、全てのwork entryの合計とする。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkReport {
    pub rows: Vec<EntryRow>,
    pub total_minutes: i64,
}

impl WorkReport {
    pub fn new(entries: &[WorkEntry]) -> Self {
        Self {
            rows: entry_rows(entries),
            total_minutes: sum_minutes(entries),
        }
    }
}

/// 出力するファイル名を返す。タイムスタンプはUNIX時間のミリ秒。
pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("work_hours_{}.pdf", now.timestamp_millis())
}

/// `WorkReport`をPDFとして出力する。
///
/// # Examples
///
/// ```
/// let mut file = File::create("work_hours.pdf")?;
/// PdfReportWriter::default().write_to(&report, &mut file)?;
/// ```
pub struct PdfReportWriter {
    rows_per_page: usize,
}

impl Default for PdfReportWriter {
    fn default() -> Self {
        Self::new(36)
    }
}

impl PdfReportWriter {
    /// 1ページあたりの行数を指定して新しい`PdfReportWriter`を返す。
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// PDFを書き込む。
    pub fn write_to<W: Write>(&self, report: &WorkReport, writer: &mut W) -> Result<()> {
        let mut doc = self.render(report)?;
        doc.save_to(writer).context("Failed to write PDF")?;

        Ok(())
    }

    /// PDFのドキュメントを組み立てる。
    ///
    /// 表の見出しは各ページに、タイトルは最初のページに、合計は最後の行の後に、フッターは各ページの下端に出力する。
    pub fn render(&self, report: &WorkReport) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let chunks: Vec<&[EntryRow]> = if report.rows.is_empty() {
            vec![report.rows.as_slice()]
        } else {
            report.rows.chunks(self.rows_per_page).collect()
        };
        let last = chunks.len() - 1;

        let mut kids: Vec<Object> = vec![];
        for (page_index, rows) in chunks.iter().enumerate() {
            let operations = page_operations(
                rows,
                page_index == 0,
                (page_index == last).then_some(report.total_minutes),
            );
            let content = Content { operations }
                .encode()
                .with_context(|| format!("Failed to encode page {}", page_index + 1))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }
}

/// 1ページ分の描画命令を返す。
///
/// `total_minutes`は最後のページの場合のみ指定する。
fn page_operations(
    rows: &[EntryRow],
    first_page: bool,
    total_minutes: Option<i64>,
) -> Vec<Operation> {
    let mut operations = vec![];
    let mut y = if first_page {
        operations.extend(text("F2", 16, MARGIN_X, TITLE_Y, TITLE));
        TABLE_TOP_FIRST_PAGE
    } else {
        TABLE_TOP
    };

    for (x, header) in COLUMN_X.iter().zip(HEADERS) {
        operations.extend(text("F2", 11, *x, y, header));
    }
    for row in rows {
        y -= ROW_HEIGHT;
        let week_number = row.week_number.to_string();
        let cells = [
            row.date.as_str(),
            week_number.as_str(),
            row.start_time.as_str(),
            row.end_time.as_str(),
            row.total_hours.as_str(),
        ];
        for (x, cell) in COLUMN_X.iter().zip(cells) {
            operations.extend(text("F1", 10, *x, y, cell));
        }
    }

    if let Some(total_minutes) = total_minutes {
        let total = format!("Total Hours: {} hrs", format_minutes_as_hours(total_minutes));
        operations.extend(text("F1", 12, MARGIN_X, y - ROW_HEIGHT - 10, &total));
    }

    operations.push(Operation::new("g", vec![Object::Real(0.6)]));
    operations.extend(text("F1", 10, MARGIN_X, FOOTER_Y, FOOTER));
    operations.push(Operation::new("g", vec![0.into()]));

    operations
}

fn text(font: &str, size: i64, x: i64, y: i64, s: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(s)]),
        Operation::new("ET", vec![]),
    ]
}
