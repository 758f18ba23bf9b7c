//! 考勤系统的画面结构
//!
//! 登录后主窗口是两个 `<frame>`：0 为左侧菜单，1 为内容区。
//! "个人选择"按钮会打开子窗口，子窗口的 1 号框架中是员工列表。

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::adapter::Locator;
use crate::models::OvertimeCategory;

/// 维护中页面的标题
pub const MAINTENANCE_TITLE: &str = "sorry page";

pub const MENU_FRAME: usize = 0;
pub const CONTENT_FRAME: usize = 1;
pub const PICKER_FRAME: usize = 1;

/// 登录画面
pub mod login {
    use super::Locator;

    pub fn company() -> Locator {
        Locator::name("DataSource")
    }

    pub fn login_id() -> Locator {
        Locator::name("LoginID")
    }

    pub fn password() -> Locator {
        Locator::name("PassWord")
    }

    pub fn submit() -> Locator {
        Locator::name("LOGINBUTTON")
    }

    /// 登录成功后出现的框架集
    pub fn frameset() -> Locator {
        Locator::xpath("//frame")
    }
}

/// 个人选择子窗口
pub mod picker {
    use super::Locator;

    pub fn member_list() -> Locator {
        Locator::name("lstSelemp")
    }

    pub fn select_all() -> Locator {
        Locator::id("AllSel")
    }

    pub fn confirm() -> Locator {
        Locator::id("buttonKAKUTEI")
    }
}

/// 通用的检索按钮
pub fn search_button() -> Locator {
    Locator::name("srchbutton")
}

/// 就业周报月报画面
pub mod monthly {
    use super::{Locator, OvertimeCategory};

    const CELL_PREFIX: &str = "grdXyw1500g-rc-";

    pub fn picker_button() -> Locator {
        Locator::xpath("//*[@id='formshow']/table/tbody/tr[2]/td/table/tbody/tr/td[4]/input")
    }

    pub fn employee_name() -> Locator {
        Locator::xpath("//*[@id='formshow']/table/tbody/tr[4]/td/table/tbody/tr/td[7]")
    }

    pub fn employee_id() -> Locator {
        Locator::xpath("//*[@id='formshow']/table/tbody/tr[4]/td/table/tbody/tr/td[6]")
    }

    pub fn month_select() -> Locator {
        Locator::id("CmbYM")
    }

    /// 单元格中保存数值的属性
    pub const VALUE_ATTRIBUTE: &str = "DefaultValue";

    pub fn column(category: OvertimeCategory) -> usize {
        match category {
            OvertimeCategory::StatutoryExcess => 13,
            OvertimeCategory::LateNight => 15,
            OvertimeCategory::HolidayWork => 16,
            OvertimeCategory::HolidayLateNight => 17,
        }
    }

    /// `day` 为 1 起算的日
    pub fn day_cell(day: u32, column: usize) -> Locator {
        Locator::id(format!("{}{}-{}", CELL_PREFIX, day.saturating_sub(1), column))
    }

    /// 日期列
    pub fn date_cell(day: u32) -> Locator {
        day_cell(day, 0)
    }

    /// 月份切换后首先等待的单元格（1 日的日期列）
    pub fn first_day_anchor() -> Locator {
        date_cell(1)
    }
}

/// 打卡遗漏一览画面
pub mod stamp_miss {
    use super::Locator;

    const ROW_PREFIX: &str = "grdXyw1120G-r-";
    const CELL_PREFIX: &str = "grdXyw1120G-rc-";

    pub const COL_EMPLOYEE_ID: usize = 0;
    pub const COL_NAME: usize = 1;
    pub const COL_DATE: usize = 2;
    pub const COL_MESSAGE: usize = 4;

    pub fn picker_button() -> Locator {
        Locator::xpath(
            "//*[@id=\"Xyw1120g_form\"]/table/tbody/tr[2]/td/table[2]/tbody/tr/td/table/tbody/tr/td[2]/input",
        )
    }

    pub fn start_input() -> Locator {
        Locator::name("StartYMD")
    }

    pub fn end_input() -> Locator {
        Locator::name("EndYMD")
    }

    pub fn row(index: usize) -> Locator {
        Locator::id(format!("{}{}", ROW_PREFIX, index))
    }

    pub fn cell(row: usize, column: usize) -> Locator {
        Locator::id(format!("{}{}-{}", CELL_PREFIX, row, column))
    }

    pub fn next_page() -> Locator {
        Locator::link_text("次ページ")
    }
}

/// 工数配分输入结果画面（按周显示）
pub mod man_hour {
    use super::Locator;

    /// 一周七天所在的列（`td[3]` ~ `td[9]`）
    pub const DAY_COLUMNS: std::ops::RangeInclusive<usize> = 3..=9;

    pub fn picker_button() -> Locator {
        Locator::xpath("/html/body/form/table/tbody/tr[2]/td/table/tbody/tr/td/table/tbody/tr/td[4]/input")
    }

    pub fn employee_name() -> Locator {
        Locator::xpath("/html/body/form/table/tbody/tr[2]/td/table/tbody/tr/td/table/tbody/tr/td[3]")
    }

    /// 当前显示的期间（`2024/03/04 ～ 2024/03/10`）
    pub fn term() -> Locator {
        Locator::xpath("/html/body/form/table/tbody/tr[2]/td/table/tbody/tr/td/table/tbody/tr/td[6]")
    }

    pub fn previous_term() -> Locator {
        Locator::name("PrevEmpCode")
    }

    pub fn next_term() -> Locator {
        Locator::name("NextEmpCode")
    }

    pub fn date_cell(column: usize) -> Locator {
        Locator::xpath(format!("//*[@id=\"xyw4100_form\"]/table/tbody/tr[1]/td[{}]", column))
    }

    pub fn working_hours(column: usize) -> Locator {
        Locator::xpath(format!("//*[@id=\"xyw4100_form\"]/table/tbody/tr[8]/td[{}]/font", column))
    }

    pub fn allocated_total(column: usize) -> Locator {
        Locator::xpath(format!("//*[@id=\"xyw4100_form\"]/table/tbody/tr[16]/td[{}]/font", column))
    }
}

fn day_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\s*(?:\d{4}/)?(?:(\d{1,2})/)?(\d{1,2})(?:\D|$)").ok())
        .as_ref()
}

fn term_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})").ok())
        .as_ref()
}

/// 日期列文字中的 (月, 日)，如 `5(火)`、`03/05(火)`、`2024/03/05`
pub fn parse_rendered_day(text: &str) -> Option<(Option<u32>, u32)> {
    let caps = day_pattern()?.captures(text)?;
    let month = caps.get(1).and_then(|m| m.as_str().parse().ok());
    let day = caps.get(2)?.as_str().parse().ok()?;
    Some((month, day))
}

/// 画面上的日期是否与预期一致；无法解析时返回 `None`
pub fn rendered_day_matches(text: &str, expected: NaiveDate) -> Option<bool> {
    let (month, day) = parse_rendered_day(text)?;
    Some(day == expected.day() && month.map_or(true, |m| m == expected.month()))
}

/// 期间文字中的开始日
pub fn parse_term_start(text: &str) -> Option<NaiveDate> {
    let caps = term_pattern()?.captures(text)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_cell_ids() {
        assert_eq!(
            monthly::day_cell(5, monthly::column(OvertimeCategory::LateNight)),
            Locator::id("grdXyw1500g-rc-4-15")
        );
        assert_eq!(monthly::first_day_anchor(), Locator::id("grdXyw1500g-rc-0-0"));
        assert_eq!(stamp_miss::cell(2, stamp_miss::COL_MESSAGE), Locator::id("grdXyw1120G-rc-2-4"));
    }

    #[test]
    fn test_rendered_day() {
        assert_eq!(parse_rendered_day("5(火)"), Some((None, 5)));
        assert_eq!(parse_rendered_day("03/05(火)"), Some((Some(3), 5)));
        assert_eq!(parse_rendered_day("2024/03/05"), Some((Some(3), 5)));
        assert_eq!(parse_rendered_day("合計"), None);

        assert_eq!(rendered_day_matches("05(火)", ymd(2024, 3, 5)), Some(true));
        assert_eq!(rendered_day_matches("03/06", ymd(2024, 3, 5)), Some(false));
        assert_eq!(rendered_day_matches("04/05", ymd(2024, 3, 5)), Some(false));
        assert_eq!(rendered_day_matches("", ymd(2024, 3, 5)), None);
    }

    #[test]
    fn test_term_start() {
        assert_eq!(parse_term_start("2024/03/04 ～ 2024/03/10"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_term_start("2024/3/4"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_term_start("----"), None);
    }
}
