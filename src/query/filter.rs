use crate::{
    error::Error,
    query::{
        element::QueryElement,
        params::BindVars,
        value::{BindValue, ToBindValue},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connector {
    Filter,
    And,
    Or,
}

impl Connector {
    fn render(self) -> &'static str {
        match self {
            Connector::Filter => "FILTER",
            Connector::And => "\tAND",
            Connector::Or => "\tOR",
        }
    }
}

/// One condition of a filter clause. Target and operation are optional:
/// target falls back to the builder's document alias, operation to `==`.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub target: Option<QueryElement>,
    pub property: String,
    pub operation: Option<String>,
    pub value: BindValue,
}

impl FilterOption {
    pub fn new(property: impl Into<String>, value: impl ToBindValue) -> Self {
        Self {
            target: None,
            property: property.into(),
            operation: None,
            value: value.to_bind_value(),
        }
    }

    pub fn target(mut self, target: &QueryElement) -> Self {
        self.target = Some(target.clone());
        self
    }

    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

/// A filter group: one condition plus an ordered list of related conditions
/// compiled into successive `FILTER`/`AND`/`OR` lines.
///
/// `and`/`or` append a sibling to *this* node's children and return the same
/// node, so chaining from one handle extends a flat ordered sequence rather
/// than nesting deeper with every call.
#[derive(Debug, Clone)]
pub struct Filter {
    option: FilterOption,
    connector: Connector,
    children: Vec<Filter>,
}

impl Filter {
    pub(crate) fn group(option: FilterOption) -> Self {
        Self {
            option,
            connector: Connector::Filter,
            children: Vec::new(),
        }
    }

    pub fn and(&mut self, option: FilterOption) -> &mut Self {
        self.push(Connector::And, option)
    }

    pub fn or(&mut self, option: FilterOption) -> &mut Self {
        self.push(Connector::Or, option)
    }

    fn push(&mut self, connector: Connector, option: FilterOption) -> &mut Self {
        self.children.push(Filter {
            option,
            connector,
            children: Vec::new(),
        });
        self
    }

    /// Compiles this group into clause text plus its own bind map.
    ///
    /// The key counter is owned by the surrounding compilation pass and
    /// threaded through explicitly — it is shared across all groups of one
    /// query so keys stay unique even when a property repeats.
    pub(crate) fn compile(
        &self,
        document: &QueryElement,
        counter: &mut usize,
    ) -> Result<(String, BindVars), Error> {
        let mut bind_vars = BindVars::new();
        let text = self.render(document, counter, &mut bind_vars)?;
        Ok((text, bind_vars))
    }

    fn render(
        &self,
        document: &QueryElement,
        counter: &mut usize,
        bind_vars: &mut BindVars,
    ) -> Result<String, Error> {
        let mut text = String::new();
        text.push_str(self.connector.render());
        text.push('\t');

        *counter += 1;
        let key = format!("{}{}", self.option.property, counter);
        let operation = self.option.operation.as_deref().unwrap_or("==");
        let target = self.option.target.as_ref().unwrap_or(document);

        text.push_str(&format!(
            "{}.{}\t{}\t@{}\n",
            target, self.option.property, operation, key
        ));
        bind_vars.insert(key, self.option.value.clone())?;

        for child in &self.children {
            text.push_str(&child.render(document, counter, bind_vars)?);
        }

        Ok(text)
    }
}
