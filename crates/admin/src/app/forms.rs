//! Form bindings for the catalog view models.

use cms_catalog::{DeleteDto, MetaDto, ProductDto, ProductId};

use crate::app::form::{FormData, FormErrors, FormType, INVALID_VALUE_MESSAGE, checkbox, parse_field, text};

impl FormType for ProductDto {
    const NAME: &'static str = "product";

    fn bind(&mut self, data: &FormData, errors: &mut FormErrors) {
        if let Some(name) = text(data, "name") {
            self.name = name;
        }
        if let Some(slug) = text(data, "slug") {
            self.slug = slug;
        }
        if let Some(description) = text(data, "description") {
            self.description = description;
        }
        parse_field(data, "sort_order", &mut self.sort_order, errors);
        self.enabled = checkbox(data, "enabled");
    }
}

impl FormType for MetaDto {
    const NAME: &'static str = "meta";

    fn bind(&mut self, data: &FormData, _errors: &mut FormErrors) {
        if let Some(title) = text(data, "title") {
            self.title = title;
        }
        if let Some(description) = text(data, "description") {
            self.description = description;
        }
        if let Some(keywords) = text(data, "keywords") {
            self.keywords = keywords;
        }
    }
}

impl FormType for DeleteDto {
    const NAME: &'static str = "product_delete";

    fn bind(&mut self, data: &FormData, errors: &mut FormErrors) {
        self.id = match data.get("id").map(|v| v.trim()) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<ProductId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("id", INVALID_VALUE_MESSAGE);
                    None
                }
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::form::Form;

    fn submission(pairs: &[(&str, &str)]) -> FormData {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn product_form_binds_all_fields() {
        let mut form = Form::new(ProductDto::default());
        form.handle_request(Some(&submission(&[
            ("name", "Oak Table"),
            ("slug", "oak-table"),
            ("description", "Solid"),
            ("sort_order", "5"),
            ("enabled", "1"),
        ])));
        assert!(form.is_valid());
        let dto = form.data();
        assert_eq!(dto.name, "Oak Table");
        assert_eq!(dto.sort_order, 5);
        assert!(dto.enabled);
    }

    #[test]
    fn product_form_reports_bad_sort_order_and_blank_name() {
        let mut form = Form::new(ProductDto::default());
        form.handle_request(Some(&submission(&[("name", ""), ("sort_order", "first")])));
        assert!(!form.is_valid());
        assert!(form.errors().contains("name"));
        assert_eq!(
            form.errors().get("sort_order"),
            Some(&[INVALID_VALUE_MESSAGE.to_string()][..])
        );
    }

    #[test]
    fn whitespace_only_name_is_blank() {
        let mut form = Form::new(ProductDto {
            name: "Lamp".to_string(),
            ..Default::default()
        });
        form.handle_request(Some(&submission(&[("name", "   "), ("slug", "  lamp  ")])));
        assert!(!form.is_valid());
        assert!(form.errors().contains("name"));
        assert_eq!(form.data().name, "");
        assert_eq!(form.data().slug, "lamp");
    }

    #[test]
    fn unchecked_enabled_disables_an_existing_product() {
        let mut form = Form::new(ProductDto {
            name: "Lamp".to_string(),
            enabled: true,
            ..Default::default()
        });
        form.handle_request(Some(&submission(&[("name", "Lamp")])));
        assert!(form.is_valid());
        assert!(!form.data().enabled);
    }

    #[test]
    fn meta_form_keeps_unsent_fields() {
        let mut form = Form::new(MetaDto {
            title: "Old".to_string(),
            keywords: "kw".to_string(),
            ..Default::default()
        });
        form.handle_request(Some(&submission(&[("title", "New")])));
        assert!(form.is_valid());
        assert_eq!(form.data().title, "New");
        assert_eq!(form.data().keywords, "kw");
    }

    #[test]
    fn delete_form_requires_a_parsable_id() {
        let mut form = Form::new(DeleteDto::default());
        form.handle_request(Some(&submission(&[])));
        assert!(!form.is_valid());
        assert!(form.errors().contains("id"));

        let mut form = Form::new(DeleteDto::default());
        form.handle_request(Some(&submission(&[("id", "not-a-uuid")])));
        assert!(!form.is_valid());
        assert!(form.errors().get("id").is_some_and(|m| m.contains(&INVALID_VALUE_MESSAGE.to_string())));

        let id = ProductId::generate();
        let mut form = Form::new(DeleteDto::default());
        form.handle_request(Some(&submission(&[("id", id.to_string().as_str())])));
        assert!(form.is_valid());
        assert_eq!(form.data().id, Some(id));
    }
}
