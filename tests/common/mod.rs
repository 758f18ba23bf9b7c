//! 测试用的考勤系统假画面
//!
//! 在内存中模拟登录、菜单、个人选择子窗口、月报 / 打卡遗漏一览 / 工时分配三个画面，
//! 并检查每个元素只能在正确的窗口与框架中找到。
//! 可以注入：无数据月份的对话框、延迟渲染的空白单元格、与预期不一致的日期文字，
//! 以及等待某个元素时一次性的对话框或超时。

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Weekday};

use atd_check::adapter::{
    AdapterError, ElementHandle, Locator, PageAdapter, Readiness, SelectOption, SessionContext,
    WindowHandle, YearMonth,
};
use atd_check::config::Settings;
use atd_check::screens::layout::{self, login, man_hour, monthly, picker, stamp_miss};
use atd_check::screens::Waits;

pub const MAIN: &str = "main";
pub const PICKER: &str = "picker";

pub const OVERTIME_MENU: &str = "就業週報月報";
pub const STAMP_MISS_MENU: &str = "打ち忘れﾁｪｯｸﾘｽﾄ";
pub const MAN_HOUR_MENU: &str = "工数配分入力結果";

pub const NO_DATA_MESSAGE: &str = "該当するデータがありません";

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 测试用的等待参数（不真正等待）
pub fn fast_waits() -> Waits {
    Waits::new(Duration::from_millis(20), Duration::from_millis(1))
}

/// 测试用配置：短超时、短轮询
pub fn fast_settings() -> Settings {
    let mut settings = Settings::default();
    settings.site.url = "https://attendance.example.test/login".to_string();
    settings.site.company = "ACME".to_string();
    settings.site.login_id = "checker".to_string();
    settings.site.password = "secret".to_string();
    settings.timing.element_timeout_secs = 1;
    settings.timing.poll_interval_ms = 1;
    settings.timing.render_retry_limit = 3;
    settings.timing.max_term_steps = 20;
    settings
}

fn jp_weekday(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

fn days_in_month(month: YearMonth) -> u32 {
    let first = ymd(month.year, month.month, 1);
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .unwrap();
    (next - first).num_days() as u32
}

/// 等待元素时注入的一次性故障
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Modal,
    Timeout,
}

/// 画面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Menu,
    Overtime,
    StampMiss,
    ManHour,
}

/// 假画面中的员工
#[derive(Debug, Clone, Default)]
pub struct FakeEmployee {
    pub option_value: String,
    pub name: String,
    /// 月报上显示的编号，缺省与 `option_value` 相同
    pub shown_id: Option<String>,
    /// 每天四个类别的 `DefaultValue`，未登记的日子全部为 `----`
    pub overtime: BTreeMap<NaiveDate, [String; 4]>,
    /// 切换到这些月份时弹出对话框
    pub months_without_data: BTreeSet<YearMonth>,
    /// 每天的 (就业时间, 合计)，未登记的日子两边都是空白
    pub man_hours: BTreeMap<NaiveDate, (String, String)>,
}

impl FakeEmployee {
    pub fn new(option_value: &str, name: &str) -> Self {
        Self {
            option_value: option_value.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn overtime(mut self, date: NaiveDate, values: [&str; 4]) -> Self {
        self.overtime.insert(date, values.map(str::to_string));
        self
    }

    pub fn without_month(mut self, year: i32, month: u32) -> Self {
        self.months_without_data.insert(YearMonth { year, month });
        self
    }

    pub fn man_hour(mut self, date: NaiveDate, working: &str, allocated: &str) -> Self {
        self.man_hours
            .insert(date, (working.to_string(), allocated.to_string()));
        self
    }

    pub fn shown_as(mut self, id: &str) -> Self {
        self.shown_id = Some(id.to_string());
        self
    }
}

/// 解析后的元素
#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    LoginField,
    LoginSubmit,
    Frameset,
    MenuLink(Screen),
    PickerButton,
    MemberList,
    SelectAll,
    Confirm,
    MonthSelect,
    Search,
    EmployeeId,
    EmployeeName,
    DayCell { row: u32, column: usize },
    StartInput,
    EndInput,
    Row(usize),
    Cell { row: usize, column: usize },
    NextPage,
    TermName,
    Term,
    PrevTerm,
    NextTerm,
    TermDate(usize),
    Working(usize),
    Allocated(usize),
}

/// 内存中的考勤系统
pub struct FakeHrApp {
    session: SessionContext,
    pub employees: Vec<FakeEmployee>,
    pub maintenance: bool,
    pub reject_login: bool,
    logged_in: bool,
    screen: Screen,

    picker_open: bool,
    picker_choice: Option<String>,
    picker_all: bool,
    selected: Option<usize>,
    all_selected: bool,

    /// 选择员工后初始显示的月份
    pub initial_month: YearMonth,
    pending_month: Option<YearMonth>,
    displayed_month: Option<YearMonth>,
    modal: Option<String>,
    /// (日期, 列) → 还会读到空白的次数
    blanks: HashMap<(NaiveDate, usize), u32>,
    /// 日期列的文字覆盖
    date_labels: HashMap<NaiveDate, String>,
    faults: Vec<(Locator, Fault)>,

    pub stamp_pages: Vec<Vec<[String; 4]>>,
    stamp_page: usize,
    stamp_searched: bool,
    stamp_modal_on_search: bool,
    start_input: String,
    end_input: String,

    /// 选择员工后初始显示的周
    pub initial_term: NaiveDate,
    term_start: NaiveDate,

    pub search_clicks: usize,
    pub month_changes: Vec<YearMonth>,
    pub term_clicks: usize,
    pub scrolls: usize,
    pub closed: bool,
}

impl Default for FakeHrApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHrApp {
    pub fn new() -> Self {
        Self {
            session: SessionContext::new(WindowHandle::new(MAIN)),
            employees: Vec::new(),
            maintenance: false,
            reject_login: false,
            logged_in: false,
            screen: Screen::Login,
            picker_open: false,
            picker_choice: None,
            picker_all: false,
            selected: None,
            all_selected: false,
            initial_month: YearMonth {
                year: 2024,
                month: 4,
            },
            pending_month: None,
            displayed_month: None,
            modal: None,
            blanks: HashMap::new(),
            date_labels: HashMap::new(),
            faults: Vec::new(),
            stamp_pages: Vec::new(),
            stamp_page: 0,
            stamp_searched: false,
            stamp_modal_on_search: false,
            start_input: String::new(),
            end_input: String::new(),
            initial_term: ymd(2024, 3, 11),
            term_start: ymd(2024, 3, 11),
            search_clicks: 0,
            month_changes: Vec::new(),
            term_clicks: 0,
            scrolls: 0,
            closed: false,
        }
    }

    pub fn with_employee(mut self, employee: FakeEmployee) -> Self {
        self.employees.push(employee);
        self
    }

    /// 跳过登录与菜单，直接停在指定画面的内容框架
    pub fn on_screen(mut self, screen: Screen) -> Self {
        self.logged_in = true;
        self.screen = screen;
        self.session.reset_frames();
        self.session.enter_frame(layout::CONTENT_FRAME);
        self
    }

    /// 某个单元格前 `count` 次读取为空白（`column` 0 为日期列）
    pub fn blank_reads(mut self, date: NaiveDate, column: usize, count: u32) -> Self {
        self.blanks.insert((date, column), count);
        self
    }

    /// 下一次等待 `locator` 时发生 `fault`
    pub fn fail_once(mut self, locator: Locator, fault: Fault) -> Self {
        self.faults.push((locator, fault));
        self
    }

    pub fn date_label(mut self, date: NaiveDate, label: &str) -> Self {
        self.date_labels.insert(date, label.to_string());
        self
    }

    /// 打卡遗漏一览的一页（社員番号, 氏名, 対象日, メッセージ）
    pub fn stamp_page(mut self, rows: &[[&str; 4]]) -> Self {
        self.stamp_pages
            .push(rows.iter().map(|r| r.map(str::to_string)).collect());
        self
    }

    /// 期间输入框已有值且已检索过
    pub fn stamp_prefilled(mut self, start: &str, end: &str) -> Self {
        self.start_input = start.to_string();
        self.end_input = end.to_string();
        self.stamp_searched = true;
        self
    }

    pub fn stamp_search_shows_modal(mut self) -> Self {
        self.stamp_modal_on_search = true;
        self
    }

    pub fn start_term(mut self, start: NaiveDate) -> Self {
        self.initial_term = start;
        self.term_start = start;
        self
    }

    pub fn stamp_inputs(&self) -> (&str, &str) {
        (&self.start_input, &self.end_input)
    }

    fn take_modal(&mut self) -> Result<(), AdapterError> {
        match self.modal.take() {
            Some(message) => Err(AdapterError::UnexpectedModalPresent { message }),
            None => Ok(()),
        }
    }

    fn in_main_content(&self) -> bool {
        self.logged_in
            && self.session.window().as_str() == MAIN
            && self.session.frame_path() == [layout::CONTENT_FRAME]
    }

    fn in_menu(&self) -> bool {
        self.logged_in
            && self.session.window().as_str() == MAIN
            && self.session.frame_path() == [layout::MENU_FRAME]
    }

    fn in_picker(&self) -> bool {
        self.picker_open
            && self.session.window().as_str() == PICKER
            && self.session.frame_path() == [layout::PICKER_FRAME]
    }

    fn at_main_top(&self) -> bool {
        self.session.window().as_str() == MAIN && self.session.frame_path().is_empty()
    }

    fn current_employee(&self) -> Option<&FakeEmployee> {
        self.selected.and_then(|i| self.employees.get(i))
    }

    fn picker_button(&self) -> Option<Locator> {
        match self.screen {
            Screen::Overtime => Some(monthly::picker_button()),
            Screen::StampMiss => Some(stamp_miss::picker_button()),
            Screen::ManHour => Some(man_hour::picker_button()),
            _ => None,
        }
    }

    /// 在当前焦点下解析元素，找不到时返回 `None`
    fn resolve(&self, locator: &Locator) -> Option<Element> {
        if self.at_main_top() && !self.logged_in {
            let fields = [login::company(), login::login_id(), login::password()];
            if fields.contains(locator) {
                return Some(Element::LoginField);
            }
            if *locator == login::submit() {
                return Some(Element::LoginSubmit);
            }
            return None;
        }
        if self.at_main_top() && self.logged_in && *locator == login::frameset() {
            return Some(Element::Frameset);
        }

        if self.in_menu() {
            return match locator {
                Locator::LinkTitle(title) if title == OVERTIME_MENU => {
                    Some(Element::MenuLink(Screen::Overtime))
                }
                Locator::LinkTitle(title) if title == STAMP_MISS_MENU => {
                    Some(Element::MenuLink(Screen::StampMiss))
                }
                Locator::LinkTitle(title) if title == MAN_HOUR_MENU => {
                    Some(Element::MenuLink(Screen::ManHour))
                }
                _ => None,
            };
        }

        if self.in_picker() {
            if *locator == picker::member_list() {
                return Some(Element::MemberList);
            }
            if *locator == picker::select_all() {
                return Some(Element::SelectAll);
            }
            if *locator == picker::confirm() {
                return Some(Element::Confirm);
            }
            return None;
        }

        if !self.in_main_content() {
            return None;
        }
        if Some(locator) == self.picker_button().as_ref() {
            return Some(Element::PickerButton);
        }
        match self.screen {
            Screen::Overtime => self.resolve_monthly(locator),
            Screen::StampMiss => self.resolve_stamp_miss(locator),
            Screen::ManHour => self.resolve_man_hour(locator),
            _ => None,
        }
    }

    fn resolve_monthly(&self, locator: &Locator) -> Option<Element> {
        if *locator == monthly::month_select() {
            return Some(Element::MonthSelect);
        }
        if *locator == layout::search_button() {
            return Some(Element::Search);
        }
        self.current_employee()?;
        if *locator == monthly::employee_id() {
            return Some(Element::EmployeeId);
        }
        if *locator == monthly::employee_name() {
            return Some(Element::EmployeeName);
        }
        let month = self.displayed_month?;
        let Locator::Id(id) = locator else {
            return None;
        };
        let (row, column) = id.strip_prefix("grdXyw1500g-rc-")?.split_once('-')?;
        let row: u32 = row.parse().ok()?;
        let column: usize = column.parse().ok()?;
        if row >= days_in_month(month) {
            return None;
        }
        Some(Element::DayCell { row, column })
    }

    fn resolve_stamp_miss(&self, locator: &Locator) -> Option<Element> {
        if *locator == stamp_miss::start_input() {
            return Some(Element::StartInput);
        }
        if *locator == stamp_miss::end_input() {
            return Some(Element::EndInput);
        }
        if *locator == layout::search_button() {
            return Some(Element::Search);
        }
        if !(self.stamp_searched && self.all_selected) {
            return None;
        }
        let rows = self.stamp_pages.get(self.stamp_page)?;
        if *locator == stamp_miss::next_page() {
            return (self.stamp_page + 1 < self.stamp_pages.len()).then_some(Element::NextPage);
        }
        for index in 0..rows.len() {
            if *locator == stamp_miss::row(index) {
                return Some(Element::Row(index));
            }
            for column in [
                stamp_miss::COL_EMPLOYEE_ID,
                stamp_miss::COL_NAME,
                stamp_miss::COL_DATE,
                stamp_miss::COL_MESSAGE,
            ] {
                if *locator == stamp_miss::cell(index, column) {
                    return Some(Element::Cell { row: index, column });
                }
            }
        }
        None
    }

    fn resolve_man_hour(&self, locator: &Locator) -> Option<Element> {
        self.current_employee()?;
        if *locator == man_hour::employee_name() {
            return Some(Element::TermName);
        }
        if *locator == man_hour::term() {
            return Some(Element::Term);
        }
        if *locator == man_hour::previous_term() {
            return Some(Element::PrevTerm);
        }
        if *locator == man_hour::next_term() {
            return Some(Element::NextTerm);
        }
        for column in man_hour::DAY_COLUMNS {
            if *locator == man_hour::date_cell(column) {
                return Some(Element::TermDate(column));
            }
            if *locator == man_hour::working_hours(column) {
                return Some(Element::Working(column));
            }
            if *locator == man_hour::allocated_total(column) {
                return Some(Element::Allocated(column));
            }
        }
        None
    }

    fn element(&self, handle: &ElementHandle) -> Result<Element, AdapterError> {
        let stale = || AdapterError::StaleElement {
            locator: handle.locator().clone(),
        };
        if handle.window() != self.session.window()
            || handle.frame_path() != self.session.frame_path()
        {
            return Err(stale());
        }
        self.resolve(handle.locator()).ok_or_else(stale)
    }

    fn overtime_column(column: usize) -> Option<usize> {
        match column {
            13 => Some(0),
            15 => Some(1),
            16 => Some(2),
            17 => Some(3),
            _ => None,
        }
    }

    fn day_date(&self, row: u32) -> Option<NaiveDate> {
        let month = self.displayed_month?;
        NaiveDate::from_ymd_opt(month.year, month.month, row + 1)
    }

    /// 延迟渲染：还有空白次数时返回空白
    fn lagging(&mut self, date: NaiveDate, column: usize) -> bool {
        match self.blanks.get_mut(&(date, column)) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn term_date(&self, column: usize) -> NaiveDate {
        self.term_start + Days::new((column - 3) as u64)
    }

    fn text_of(&mut self, element: &Element) -> String {
        match element {
            Element::EmployeeId => self
                .current_employee()
                .map(|e| e.shown_id.clone().unwrap_or_else(|| e.option_value.clone()))
                .unwrap_or_default(),
            Element::EmployeeName | Element::TermName => self
                .current_employee()
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            Element::DayCell { row, column: 0 } => {
                let Some(date) = self.day_date(*row) else {
                    return String::new();
                };
                if self.lagging(date, 0) {
                    return String::new();
                }
                self.date_labels
                    .get(&date)
                    .cloned()
                    .unwrap_or_else(|| format!("{}({})", date.day(), jp_weekday(date)))
            }
            Element::Cell { row, column } => {
                let index = match *column {
                    stamp_miss::COL_EMPLOYEE_ID => 0,
                    stamp_miss::COL_NAME => 1,
                    stamp_miss::COL_DATE => 2,
                    _ => 3,
                };
                self.stamp_pages[self.stamp_page][*row][index].clone()
            }
            Element::Term => {
                let end = self.term_start + Days::new(6);
                format!(
                    "{} ～ {}",
                    self.term_start.format("%Y/%m/%d"),
                    end.format("%Y/%m/%d")
                )
            }
            Element::TermDate(column) => {
                let date = self.term_date(*column);
                format!("{:02}/{:02}({})", date.month(), date.day(), jp_weekday(date))
            }
            Element::Working(column) | Element::Allocated(column) => {
                let date = self.term_date(*column);
                let working = matches!(element, Element::Working(_));
                self.current_employee()
                    .and_then(|e| e.man_hours.get(&date))
                    .map(|(w, a)| if working { w.clone() } else { a.clone() })
                    .unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    fn attribute_of(&mut self, element: &Element, name: &str) -> Option<String> {
        match (element, name) {
            (Element::StartInput, "value") => Some(self.start_input.clone()),
            (Element::EndInput, "value") => Some(self.end_input.clone()),
            (Element::DayCell { row, column }, monthly::VALUE_ATTRIBUTE) => {
                let date = self.day_date(*row)?;
                let index = Self::overtime_column(*column)?;
                if self.lagging(date, *column) {
                    return Some(String::new());
                }
                let value = self
                    .current_employee()
                    .and_then(|e| e.overtime.get(&date))
                    .map(|values| values[index].clone())
                    .unwrap_or_else(|| "----".to_string());
                Some(value)
            }
            _ => None,
        }
    }

    fn on_click(&mut self, element: Element) {
        match element {
            Element::LoginSubmit => {
                if !self.reject_login {
                    self.logged_in = true;
                    self.screen = Screen::Menu;
                }
            }
            Element::MenuLink(screen) => {
                self.screen = screen;
                self.selected = None;
                self.all_selected = false;
                self.displayed_month = None;
            }
            Element::PickerButton => {
                self.picker_open = true;
                self.picker_choice = None;
                self.picker_all = false;
            }
            Element::SelectAll => self.picker_all = true,
            Element::Confirm => {
                if self.picker_all {
                    self.all_selected = true;
                    self.selected = None;
                } else if let Some(choice) = self.picker_choice.take() {
                    self.selected = self.employees.iter().position(|e| e.option_value == choice);
                    self.all_selected = false;
                }
                self.displayed_month = Some(self.initial_month);
                self.term_start = self.initial_term;
                self.picker_open = false;
            }
            Element::Search => {
                self.search_clicks += 1;
                match self.screen {
                    Screen::Overtime => {
                        if let Some(month) = self.pending_month.take() {
                            self.month_changes.push(month);
                            let unavailable = self
                                .current_employee()
                                .map_or(false, |e| e.months_without_data.contains(&month));
                            if unavailable {
                                self.displayed_month = None;
                                self.modal = Some(NO_DATA_MESSAGE.to_string());
                            } else {
                                self.displayed_month = Some(month);
                            }
                        }
                    }
                    Screen::StampMiss => {
                        self.stamp_page = 0;
                        if self.stamp_modal_on_search {
                            self.stamp_searched = false;
                            self.modal = Some(NO_DATA_MESSAGE.to_string());
                        } else {
                            self.stamp_searched = true;
                        }
                    }
                    _ => {}
                }
            }
            Element::NextPage => self.stamp_page += 1,
            Element::PrevTerm => {
                self.term_clicks += 1;
                self.term_start = self.term_start - Days::new(7);
            }
            Element::NextTerm => {
                self.term_clicks += 1;
                self.term_start = self.term_start + Days::new(7);
            }
            _ => {}
        }
    }

    fn timeout(locator: &Locator, condition: &Readiness, timeout: Duration) -> AdapterError {
        AdapterError::ElementTimeout {
            locator: locator.clone(),
            condition: condition.clone(),
            timeout,
        }
    }
}

#[async_trait]
impl PageAdapter for FakeHrApp {
    fn session(&self) -> &SessionContext {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    async fn goto(&mut self, _url: &str) -> Result<(), AdapterError> {
        self.logged_in = false;
        self.screen = Screen::Login;
        self.session.reset_frames();
        self.take_modal()
    }

    async fn title(&mut self) -> Result<String, AdapterError> {
        Ok(if self.maintenance {
            layout::MAINTENANCE_TITLE.to_string()
        } else {
            "ログイン".to_string()
        })
    }

    async fn await_and_locate(
        &mut self,
        locator: &Locator,
        condition: &Readiness,
        timeout: Duration,
    ) -> Result<ElementHandle, AdapterError> {
        self.take_modal()?;
        if let Some(index) = self.faults.iter().position(|(l, _)| l == locator) {
            let (_, fault) = self.faults.remove(index);
            return Err(match fault {
                Fault::Modal => AdapterError::UnexpectedModalPresent {
                    message: NO_DATA_MESSAGE.to_string(),
                },
                Fault::Timeout => Self::timeout(locator, condition, timeout),
            });
        }
        match self.resolve(locator) {
            Some(_) => Ok(ElementHandle::in_session(locator.clone(), &self.session)),
            None => Err(Self::timeout(locator, condition, timeout)),
        }
    }

    async fn read(&mut self, handle: &ElementHandle) -> Result<String, AdapterError> {
        self.take_modal()?;
        let element = self.element(handle)?;
        Ok(self.text_of(&element).trim().to_string())
    }

    async fn read_attribute(
        &mut self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, AdapterError> {
        self.take_modal()?;
        let element = self.element(handle)?;
        Ok(self.attribute_of(&element, name))
    }

    async fn list_options(
        &mut self,
        handle: &ElementHandle,
    ) -> Result<Vec<SelectOption>, AdapterError> {
        self.take_modal()?;
        match self.element(handle)? {
            Element::MemberList => Ok(self
                .employees
                .iter()
                .map(|e| SelectOption {
                    value: e.option_value.clone(),
                    text: e.name.clone(),
                })
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn click(&mut self, handle: &ElementHandle) -> Result<(), AdapterError> {
        self.take_modal()?;
        let element = self.element(handle)?;
        self.on_click(element);
        Ok(())
    }

    async fn select_option(
        &mut self,
        handle: &ElementHandle,
        value: &str,
    ) -> Result<(), AdapterError> {
        self.take_modal()?;
        let no_option = || AdapterError::NoSuchOption {
            locator: handle.locator().clone(),
            value: value.to_string(),
        };
        match self.element(handle)? {
            Element::MemberList => {
                if !self.employees.iter().any(|e| e.option_value == value) {
                    return Err(no_option());
                }
                self.picker_choice = Some(value.to_string());
                Ok(())
            }
            Element::MonthSelect => {
                let year = value.get(0..4).and_then(|y| y.parse().ok());
                let month = value.get(4..6).and_then(|m| m.parse().ok());
                match (year, month) {
                    (Some(year), Some(month)) if value.len() == 6 => {
                        self.pending_month = Some(YearMonth { year, month });
                        Ok(())
                    }
                    _ => Err(no_option()),
                }
            }
            _ => Err(no_option()),
        }
    }

    async fn clear(&mut self, handle: &ElementHandle) -> Result<(), AdapterError> {
        self.take_modal()?;
        match self.element(handle)? {
            Element::StartInput => self.start_input.clear(),
            Element::EndInput => self.end_input.clear(),
            _ => {}
        }
        Ok(())
    }

    async fn type_text(&mut self, handle: &ElementHandle, text: &str) -> Result<(), AdapterError> {
        self.take_modal()?;
        match self.element(handle)? {
            Element::StartInput => self.start_input.push_str(text),
            Element::EndInput => self.end_input.push_str(text),
            _ => {}
        }
        Ok(())
    }

    async fn scroll_into_view(&mut self, handle: &ElementHandle) -> Result<(), AdapterError> {
        self.take_modal()?;
        self.element(handle)?;
        self.scrolls += 1;
        Ok(())
    }

    async fn switch_to_frame(&mut self, index: usize) -> Result<(), AdapterError> {
        self.take_modal()?;
        let exists = match (self.session.window().as_str(), self.session.frame_path()) {
            (MAIN, []) => self.logged_in && index <= layout::CONTENT_FRAME,
            (PICKER, []) => self.picker_open && index <= layout::PICKER_FRAME,
            _ => false,
        };
        if !exists {
            return Err(AdapterError::NoSuchFrame { index });
        }
        self.session.enter_frame(index);
        Ok(())
    }

    async fn switch_to_window(&mut self, handle: &WindowHandle) -> Result<(), AdapterError> {
        let exists = handle.as_str() == MAIN || (handle.as_str() == PICKER && self.picker_open);
        if !exists {
            return Err(AdapterError::NoSuchWindow(handle.clone()));
        }
        self.session.enter_window(handle.clone());
        Ok(())
    }

    async fn list_window_handles(&mut self) -> Result<Vec<WindowHandle>, AdapterError> {
        let mut handles = vec![WindowHandle::new(MAIN)];
        if self.picker_open {
            handles.push(WindowHandle::new(PICKER));
        }
        Ok(handles)
    }

    async fn close(&mut self) -> Result<(), AdapterError> {
        self.closed = true;
        Ok(())
    }
}
