use std::collections::BTreeSet;
use std::fmt;

/// 规范化员工编号：去掉首尾空白与前导零
///
/// 画面上的编号可能是 `000123`，名册中是 `123`。
pub fn normalize_employee_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let stripped = trimmed.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// 员工选择框中的一个员工
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRef {
    /// 选项值（原样，用于选择）
    pub option_value: String,
    /// 显示名称
    pub name: String,
}

impl EmployeeRef {
    pub fn new(option_value: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            option_value: option_value.into(),
            name: name.into(),
        }
    }

    /// 规范化后的编号
    pub fn id(&self) -> String {
        normalize_employee_id(&self.option_value)
    }
}

impl fmt::Display for EmployeeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id(), self.name)
    }
}

/// 员工编号白名单，`None` 表示全部员工
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    allowed: Option<BTreeSet<String>>,
}

impl EmployeeFilter {
    pub fn all() -> Self {
        Self { allowed: None }
    }

    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = ids
            .into_iter()
            .map(|id| normalize_employee_id(id.as_ref()))
            .filter(|id| !id.is_empty())
            .collect();
        Self {
            allowed: Some(allowed),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.allowed.is_some()
    }

    pub fn allows(&self, raw_id: &str) -> bool {
        match &self.allowed {
            None => true,
            Some(allowed) => allowed.contains(&normalize_employee_id(raw_id)),
        }
    }

    /// 保留白名单中的员工，顺序不变
    pub fn apply(&self, employees: Vec<EmployeeRef>) -> Vec<EmployeeRef> {
        employees
            .into_iter()
            .filter(|e| self.allows(&e.option_value))
            .collect()
    }
}
