//! Command-line surface: each invocation is one UI action.

use catalog_bridge::ResourceAction;
use catalog_bridge::models::{CategoryDraft, ProductDraft, QueryParams, QueryValue};
use catalog_frontend::Command;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "catalog-admin",
    version,
    about = "Browse and edit catalog products and categories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub resource: Resource,
}

impl Cli {
    pub fn into_command(self) -> Command {
        match self.resource {
            Resource::Products(command) => Command::Products(command.into_action()),
            Resource::Categories(command) => Command::Categories(command.into_action()),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Resource {
    /// Manage products.
    #[command(subcommand)]
    Products(ProductCommand),
    /// Manage categories.
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List products.
    List(ListArgs),
    /// Show a single product.
    Get { id: String },
    /// Create a product.
    Create(ProductFields),
    /// Update fields of a product.
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product.
    Delete { id: String },
}

impl ProductCommand {
    fn into_action(self) -> ResourceAction<ProductDraft> {
        match self {
            ProductCommand::List(args) => ResourceAction::List(args.into_params()),
            ProductCommand::Get { id } => ResourceAction::Fetch(id),
            ProductCommand::Create(fields) => ResourceAction::Create(fields.into()),
            ProductCommand::Update { id, fields } => ResourceAction::Update(id, fields.into()),
            ProductCommand::Delete { id } => ResourceAction::Delete(id),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories.
    List(ListArgs),
    /// Show a single category.
    Get { id: String },
    /// Create a category.
    Create(CategoryFields),
    /// Update fields of a category.
    Update {
        id: String,
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Delete a category.
    Delete { id: String },
}

impl CategoryCommand {
    fn into_action(self) -> ResourceAction<CategoryDraft> {
        match self {
            CategoryCommand::List(args) => ResourceAction::List(args.into_params()),
            CategoryCommand::Get { id } => ResourceAction::Fetch(id),
            CategoryCommand::Create(fields) => ResourceAction::Create(fields.into()),
            CategoryCommand::Update { id, fields } => ResourceAction::Update(id, fields.into()),
            CategoryCommand::Delete { id } => ResourceAction::Delete(id),
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page to fetch, starting at 1.
    #[arg(long)]
    pub page: Option<u32>,
    /// Records per page.
    #[arg(long)]
    pub limit: Option<u32>,
    /// Free-text search term.
    #[arg(long)]
    pub search: Option<String>,
    /// Extra query parameter as `key=value`; may be repeated.
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, QueryValue)>,
}

impl ListArgs {
    fn into_params(self) -> QueryParams {
        let params = QueryParams::new()
            .with_opt("page", self.page)
            .with_opt("limit", self.limit)
            .with_opt("search", self.search);
        self.params
            .into_iter()
            .fold(params, |params, (key, value)| params.with(key, value))
    }
}

/// Parses `key=value`, reading booleans and numbers as such.
fn parse_param(raw: &str) -> Result<(String, QueryValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    if key.is_empty() {
        return Err(format!("missing parameter name in {raw:?}"));
    }

    let value = if let Ok(flag) = value.parse::<bool>() {
        QueryValue::Bool(flag)
    } else if let Ok(number) = value.parse::<i64>() {
        QueryValue::Int(number)
    } else if let Ok(number) = value.parse::<f64>() {
        QueryValue::Float(number)
    } else {
        QueryValue::Str(value.to_string())
    };
    Ok((key.to_string(), value))
}

#[derive(Debug, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub sku: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub stock: Option<i64>,
    /// Id of the category the product belongs to.
    #[arg(long = "category")]
    pub category_id: Option<String>,
}

impl From<ProductFields> for ProductDraft {
    fn from(fields: ProductFields) -> Self {
        ProductDraft {
            sku: fields.sku,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            stock: fields.stock,
            category_id: fields.category_id,
        }
    }
}

#[derive(Debug, Args)]
pub struct CategoryFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub slug: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl From<CategoryFields> for CategoryDraft {
    fn from(fields: CategoryFields) -> Self {
        CategoryDraft {
            name: fields.name,
            slug: fields.slug,
            description: fields.description,
        }
    }
}
