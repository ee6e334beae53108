//! Search term and column filters for the shipping address list.

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressColumn {
    Country,
    City,
    Street,
    Building,
}

impl AddressColumn {
    pub const ALL: [AddressColumn; 4] = [
        AddressColumn::Country,
        AddressColumn::City,
        AddressColumn::Street,
        AddressColumn::Building,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AddressColumn::Country => "country",
            AddressColumn::City => "city",
            AddressColumn::Street => "street",
            AddressColumn::Building => "building",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AddressColumn::Country => "Country",
            AddressColumn::City => "City",
            AddressColumn::Street => "Street",
            AddressColumn::Building => "Building",
        }
    }

    fn sql(self) -> &'static str {
        match self {
            AddressColumn::Country => "a.country",
            AddressColumn::City => "a.city",
            AddressColumn::Street => "a.street",
            AddressColumn::Building => "a.building",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Contains,
    NotContains,
    Equals,
    NotEquals,
    Empty,
    NotEmpty,
}

impl FilterOp {
    pub const ALL: [FilterOp; 6] = [
        FilterOp::Contains,
        FilterOp::NotContains,
        FilterOp::Equals,
        FilterOp::NotEquals,
        FilterOp::Empty,
        FilterOp::NotEmpty,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.key() == value)
    }

    pub fn key(self) -> &'static str {
        match self {
            FilterOp::Contains => "contains",
            FilterOp::NotContains => "not_contains",
            FilterOp::Equals => "equals",
            FilterOp::NotEquals => "not_equals",
            FilterOp::Empty => "empty",
            FilterOp::NotEmpty => "not_empty",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterOp::Contains => "contains",
            FilterOp::NotContains => "not contains",
            FilterOp::Equals => "equals",
            FilterOp::NotEquals => "not equal",
            FilterOp::Empty => "empty",
            FilterOp::NotEmpty => "not empty",
        }
    }

    fn needs_value(self) -> bool {
        !matches!(self, FilterOp::Empty | FilterOp::NotEmpty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: AddressColumn,
    pub op: FilterOp,
    pub value: String,
}

/// Query string of the address list: `search`, `flt_<column>` and `op_<column>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressSearchParams {
    pub search: Option<String>,
    pub flt_country: Option<String>,
    pub op_country: Option<String>,
    pub flt_city: Option<String>,
    pub op_city: Option<String>,
    pub flt_street: Option<String>,
    pub op_street: Option<String>,
    pub flt_building: Option<String>,
    pub op_building: Option<String>,
}

impl AddressSearchParams {
    fn pair(&self, column: AddressColumn) -> (Option<&str>, Option<&str>) {
        match column {
            AddressColumn::Country => (self.flt_country.as_deref(), self.op_country.as_deref()),
            AddressColumn::City => (self.flt_city.as_deref(), self.op_city.as_deref()),
            AddressColumn::Street => (self.flt_street.as_deref(), self.op_street.as_deref()),
            AddressColumn::Building => (self.flt_building.as_deref(), self.op_building.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressQuery {
    pub search: Option<String>,
    pub filters: Vec<Filter>,
}

impl AddressQuery {
    /// Blank values are ignored, except for the `empty`/`not_empty` operators.
    pub fn from_params(params: &AddressSearchParams) -> Result<Self, AppError> {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut filters = Vec::new();
        for column in AddressColumn::ALL {
            let (value, op) = params.pair(column);
            let op = match op.map(str::trim).filter(|o| !o.is_empty()) {
                Some(raw) => FilterOp::parse(raw).ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown filter operator '{raw}'"))
                })?,
                None => FilterOp::Contains,
            };
            let value = value.map(str::trim).unwrap_or_default();
            if op.needs_value() && value.is_empty() {
                continue;
            }
            filters.push(Filter {
                column,
                op,
                value: value.to_string(),
            });
        }

        Ok(AddressQuery { search, filters })
    }

    /// Append ` WHERE …` for this query. Column names come from a closed enum;
    /// user input only ever travels as bind parameters.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE TRUE");

        if let Some(term) = &self.search {
            let pattern = format!("%{}%", escape_like(term));
            qb.push(" AND (");
            for (i, column) in AddressColumn::ALL.into_iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(column.sql())
                    .push(" ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\'");
            }
            qb.push(")");
        }

        for filter in &self.filters {
            qb.push(" AND ").push(filter.column.sql());
            match filter.op {
                FilterOp::Contains => {
                    qb.push(" ILIKE ")
                        .push_bind(format!("%{}%", escape_like(&filter.value)))
                        .push(" ESCAPE '\\'");
                }
                FilterOp::NotContains => {
                    qb.push(" NOT ILIKE ")
                        .push_bind(format!("%{}%", escape_like(&filter.value)))
                        .push(" ESCAPE '\\'");
                }
                FilterOp::Equals => {
                    qb.push(" = ").push_bind(filter.value.clone());
                }
                FilterOp::NotEquals => {
                    qb.push(" <> ").push_bind(filter.value.clone());
                }
                FilterOp::Empty => {
                    qb.push(" = ''");
                }
                FilterOp::NotEmpty => {
                    qb.push(" <> ''");
                }
            }
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
