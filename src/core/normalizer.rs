use crate::domain::model::{Images, Service, Visibility};
use crate::utils::error::{CatalogError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

type NameSource = fn(&Value) -> Option<&str>;

/// 顯示名稱來源，依序嘗試；都沒有時退回 `name`
const UI_NAME_SOURCES: &[NameSource] = &[swagger_display_name, overview_display_name];

/// `metadata.other.swagger_urls[*].i18n.en.name`, first match across all entries.
fn swagger_display_name(entry: &Value) -> Option<&str> {
    entry
        .pointer("/metadata/other/swagger_urls")?
        .as_array()?
        .iter()
        .filter_map(|swagger| swagger.pointer("/i18n/en/name").and_then(Value::as_str))
        .find(|name| !name.is_empty())
}

fn overview_display_name(entry: &Value) -> Option<&str> {
    entry
        .pointer("/overview_ui/en/display_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

pub fn resolve_ui_name(entry: &Value) -> Result<String> {
    if let Some(name) = UI_NAME_SOURCES.iter().find_map(|source| source(entry)) {
        return Ok(name.to_string());
    }
    required_str(entry, "/name", entry_id(entry))
}

/// 服務或部署宣告的 geo_tags，缺少時為空陣列
pub fn resolve_geo_tags(entry: &Value) -> Vec<String> {
    entry
        .get("geo_tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

fn field_name(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

pub(crate) fn required<'a>(entry: &'a Value, pointer: &str, id: Option<&str>) -> Result<&'a Value> {
    match entry.pointer(pointer) {
        Some(Value::Null) | None => Err(CatalogError::malformed(field_name(pointer), id)),
        Some(value) => Ok(value),
    }
}

pub(crate) fn required_str(entry: &Value, pointer: &str, id: Option<&str>) -> Result<String> {
    required(entry, pointer, id)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CatalogError::malformed(field_name(pointer), id))
}

pub(crate) fn required_bool(entry: &Value, pointer: &str, id: Option<&str>) -> Result<bool> {
    required(entry, pointer, id)?
        .as_bool()
        .ok_or_else(|| CatalogError::malformed(field_name(pointer), id))
}

pub(crate) fn required_as<T: DeserializeOwned>(
    entry: &Value,
    pointer: &str,
    id: Option<&str>,
) -> Result<T> {
    T::deserialize(required(entry, pointer, id)?)
        .map_err(|_| CatalogError::malformed(field_name(pointer), id))
}

/// Converts one raw catalog entry into a [`Service`].
pub fn normalize_service(entry: &Value) -> Result<Service> {
    let id = required_str(entry, "/id", entry_id(entry))?;
    let id_ref = Some(id.as_str());

    Ok(Service {
        ui_name: resolve_ui_name(entry)?,
        name: required_str(entry, "/name", id_ref)?,
        kind: required_str(entry, "/kind", id_ref)?,
        provider: required_str(entry, "/provider/name", id_ref)?,
        tags: required_as(entry, "/tags", id_ref)?,
        geo_tags: resolve_geo_tags(entry),
        visibility: Visibility::from(required_str(entry, "/visibility/restrictions", id_ref)?),
        active: required_bool(entry, "/active", id_ref)?,
        disabled: required_bool(entry, "/disabled", id_ref)?,
        catalog_crn: required_str(entry, "/catalog_crn", id_ref)?,
        images: required_as::<Images>(entry, "/images", id_ref)?,
        description: required_str(entry, "/overview_ui/en/description", id_ref)?,
        created: required_as(entry, "/created", id_ref)?,
        updated: required_as(entry, "/updated", id_ref)?,
        id,
    })
}
