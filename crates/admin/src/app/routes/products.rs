//! Product screens: listing, create, edit, metadata, delete.

use axum::{
    Router,
    response::Response,
    routing::{delete, get},
};
use serde_json::json;

use cms_catalog::{DeleteDto, MetaDto, Product, ProductDto, ProductPatch};
use cms_persistence::Direction;

use crate::app::errors::AppError;
use crate::app::form::{Form, FormData, FormType, INVALID_VALUE_MESSAGE};
use crate::app::navigation::{self, product_navigation};
use crate::app::render::{PRODUCT_CREATE_TEMPLATE, PRODUCT_EDIT_TEMPLATE, PRODUCT_INDEX_TEMPLATE};
use crate::app::routing::{PRODUCT_CREATE, PRODUCT_DELETE, PRODUCT_EDIT, PRODUCT_INDEX, PRODUCT_META};
use crate::context::{ProductParam, RequestContext, Submission};

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/create", get(create_form).post(create_submit))
        .route("/edit/:id", get(edit_form).post(edit_submit))
        .route("/meta/:id", get(meta_form).post(meta_submit))
        .route("/delete", delete(delete_product))
}

pub async fn index(ctx: RequestContext) -> Result<Response, AppError> {
    let page = ctx
        .catalog()
        .provider
        .list(&[("sort_order", Direction::Asc)], ctx.pagination())
        .await?;

    let delete_form = Form::new(DeleteDto::default())
        .with_action(ctx.responder().url_for(PRODUCT_DELETE, &[])?)
        .with_csrf(ctx.csrf());

    ctx.responder().render(
        PRODUCT_INDEX_TEMPLATE,
        json!({
            "entities": page.items,
            "pagination": page.view(),
            "nav": nav(&ctx, None)?,
            "delete_form": delete_form.view(),
        }),
    )
}

pub async fn create_form(ctx: RequestContext) -> Result<Response, AppError> {
    let form = product_form(&ctx, ProductDto::default(), PRODUCT_CREATE, None)?;
    render_create(&ctx, &form)
}

pub async fn create_submit(
    ctx: RequestContext,
    Submission(data): Submission,
) -> Result<Response, AppError> {
    let mut form = product_form(&ctx, ProductDto::default(), PRODUCT_CREATE, None)?;
    form.handle_request(Some(&data));

    if !form.is_valid() {
        tracing::debug!(errors = ?form.errors(), "product create rejected");
        return render_create(&ctx, &form);
    }

    let product = ctx.catalog().processor.create(form.data()).await?;
    ctx.responder()
        .success_redirect(PRODUCT_EDIT, &[("id", product.id_typed().to_string())])
}

pub async fn edit_form(ctx: RequestContext, ProductParam(product): ProductParam) -> Result<Response, AppError> {
    let form = product_form(&ctx, ProductDto::from_entity(&product), PRODUCT_EDIT, Some(&product))?;
    render_edit(&ctx, &product, &form)
}

pub async fn edit_submit(
    ctx: RequestContext,
    ProductParam(product): ProductParam,
    Submission(data): Submission,
) -> Result<Response, AppError> {
    let form = product_form(&ctx, ProductDto::from_entity(&product), PRODUCT_EDIT, Some(&product))?;
    submit_patch(&ctx, product, form, data, PRODUCT_EDIT).await
}

pub async fn meta_form(ctx: RequestContext, ProductParam(product): ProductParam) -> Result<Response, AppError> {
    let form = product_form(&ctx, MetaDto::from_entity(&product), PRODUCT_META, Some(&product))?;
    render_edit(&ctx, &product, &form)
}

pub async fn meta_submit(
    ctx: RequestContext,
    ProductParam(product): ProductParam,
    Submission(data): Submission,
) -> Result<Response, AppError> {
    let form = product_form(&ctx, MetaDto::from_entity(&product), PRODUCT_META, Some(&product))?;
    submit_patch(&ctx, product, form, data, PRODUCT_META).await
}

pub async fn delete_product(
    ctx: RequestContext,
    Submission(data): Submission,
) -> Result<Response, AppError> {
    let mut form = Form::new(DeleteDto::default()).with_csrf(ctx.csrf());
    form.handle_request(Some(&data));

    if !form.is_valid() {
        tracing::debug!(errors = ?form.errors(), "product delete rejected");
        return Ok(ctx.responder().rejected_form(form.errors()));
    }

    match ctx.catalog().processor.delete(form.data()).await {
        Ok(_) => ctx.responder().success_redirect(PRODUCT_INDEX, &[]),
        Err(err) if err.is_not_found() => {
            form.add_error("id", INVALID_VALUE_MESSAGE);
            Ok(ctx.responder().rejected_form(form.errors()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Binds and validates `data`; valid submissions are written and redirect back to `route`.
async fn submit_patch<D>(
    ctx: &RequestContext,
    mut product: Product,
    mut form: Form<D>,
    data: FormData,
    route: &str,
) -> Result<Response, AppError>
where
    D: FormType + ProductPatch,
{
    form.handle_request(Some(&data));

    if !form.is_valid() {
        tracing::debug!(product_id = %product.id_typed(), errors = ?form.errors(), "product update rejected");
        return render_edit(ctx, &product, &form);
    }

    ctx.catalog().processor.update(form.data(), &mut product).await?;
    ctx.responder()
        .success_redirect(route, &[("id", product.id_typed().to_string())])
}

fn product_form<D: FormType>(
    ctx: &RequestContext,
    data: D,
    route: &str,
    product: Option<&Product>,
) -> Result<Form<D>, AppError> {
    let params: Vec<(&str, String)> = product
        .map(|p| vec![("id", p.id_typed().to_string())])
        .unwrap_or_default();
    Ok(Form::new(data)
        .with_action(ctx.responder().url_for(route, &params)?)
        .with_csrf(ctx.csrf()))
}

fn nav(ctx: &RequestContext, product: Option<&Product>) -> Result<Vec<navigation::NavLink>, AppError> {
    Ok(navigation::resolve(
        ctx.responder().routes(),
        &product_navigation(product),
    )?)
}

fn render_create<D: FormType>(ctx: &RequestContext, form: &Form<D>) -> Result<Response, AppError> {
    ctx.responder().render(
        PRODUCT_CREATE_TEMPLATE,
        json!({
            "form": form.view(),
            "nav": nav(ctx, None)?,
        }),
    )
}

fn render_edit<D: FormType>(
    ctx: &RequestContext,
    product: &Product,
    form: &Form<D>,
) -> Result<Response, AppError> {
    ctx.responder().render(
        PRODUCT_EDIT_TEMPLATE,
        json!({
            "entity": product,
            "form": form.view(),
            "nav": nav(ctx, Some(product))?,
        }),
    )
}
