//! Canonical field names of the content index.
//!
//! Use [`Field`] instead of string literals when composing clauses:
//!
//! ```
//! use solr_query::{clause, Field};
//!
//! let q = clause::and(&format!("{}:news", Field::AuthTemplate), Field::Topics.as_str());
//! assert_eq!(q, "(authtemplate:news AND topics)");
//! ```
//!
//! Lookups by constant name (`TOPICS_TITLE`) or by index name (`topicstitle`) go
//! through a compile-time perfect hash map.

use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use thiserror::Error;

/// Expands the catalog rows `(Variant, "CONSTANT_NAME", "wire_name")` into
/// the enum, its accessors and both lookup maps.
macro_rules! field_catalog {
    ($(($variant:ident, $constant:tt, $wire:tt)),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $($variant),*
        }

        impl Field {
            pub const ALL: &'static [Field] = &[$(Field::$variant),*];

            /// Name of the field in the index.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),*
                }
            }

            /// Upper snake case name, e.g. `TOPICS_TITLE`.
            pub fn constant_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $constant),*
                }
            }
        }

        static FIELDS_BY_NAME: phf::Map<&'static str, Field> = phf_map! {
            $($wire => Field::$variant),*
        };

        static FIELDS_BY_CONSTANT: phf::Map<&'static str, Field> = phf_map! {
            $($constant => Field::$variant),*
        };
    };
}

field_catalog! {
    (Id,                       "ID",                          "id"),
    (LibraryLocale,            "LIBRARY_LOCALE",              "documentlibrarylocale"),
    (Title,                    "TITLE",                       "title"),
    (ShortTitle,               "SHORT_TITLE",                 "shorttitle"),
    (Name,                     "NAME",                        "name"),
    (Description,              "DESCRIPTION",                 "description"),
    (Summary,                  "SUMMARY",                     "summary"),
    (ImgCaption,               "IMG_CAPTION",                 "imagecaption"),
    (ThumbCaption,             "THUMB_CAPTION",               "thumbnailcaption"),
    (WcmPath,                  "WCM_PATH",                    "wcmpath"),
    (WcmTitlePath,             "WCM_TITLE_PATH",              "wcmtitlepath"),
    (AuthTemplate,             "AUTH_TEMPLATE",               "authtemplate"),
    (ReferenceUrlName,         "REFERENCE_URL_NAME",          "referenceurlname"),
    (ContentType,              "CONTENT_TYPE",                "contenttype"),
    (ContentTypeTitle,         "CONTENT_TYPE_TITLE",          "contenttypetitle"),
    (ContentTypePath,          "CONTENT_TYPE_PATH",           "contenttypepath"),
    (ContentTypePathTitle,     "CONTENT_TYPE_PATH_TITLE",     "contenttypepathtitle"),
    (AudienceCountry,          "AUDIENCE_COUNTRY",            "audiencecountry"),
    (AudienceCountryTitle,     "AUDIENCE_COUNTRY_TITLE",      "audiencecountrytitle"),
    (AudienceCountryPath,      "AUDIENCE_COUNTRY_PATH",       "audiencecountrypath"),
    (AudienceCountryPathTitle, "AUDIENCE_COUNTRY_PATH_TITLE", "audiencecountrypathtitle"),
    (AudienceBrand,            "AUDIENCE_BRAND",              "audiencebrand"),
    (AudienceBrandTitle,       "AUDIENCE_BRAND_TITLE",        "audiencebrandtitle"),
    (RelatedHubs,              "RELATED_HUBS",                "relatedHubs"),
    (RelatedHubsTitle,         "RELATED_HUBS_TITLE",          "relatedHubstitle"),
    (RelatedHubsPath,          "RELATED_HUBS_PATH",           "relatedHubspath"),
    (RelatedHubsPathTitle,     "RELATED_HUBS_PATH_TITLE",     "relatedHubspathtitle"),
    (TargetRole,               "TARGET_ROLE",                 "targetingRole"),
    (TargetRoleTitle,          "TARGET_ROLE_TITLE",           "targetingRoletitle"),
    (TargetRolePath,           "TARGET_ROLE_PATH",            "targetingRolepath"),
    (TargetRolePathTitle,      "TARGET_ROLE_PATH_TITLE",      "targetingRolepathtitle"),
    (PublishDate,              "PUBLISH_DATE",                "publishdate"),
    (LibraryName,              "LIBRARY_NAME",                "documentlibraryname"),
    (Icon,                     "ICON",                        "icon"),
    (Link,                     "LINK",                        "link"),
    (MoreInfo,                 "MORE_INFO",                   "moreInformation"),
    (Thumbnail,                "THUMBNAIL",                   "thumbnail"),
    (Image,                    "IMAGE",                       "image"),
    (PortalLocation,           "PORTAL_LOCATION",             "portallocation"),
    (PortalLocationTitle,      "PORTAL_LOCATION_TITLE",       "portallocationtitle"),
    (PortalLocationPath,       "PORTAL_LOCATION_PATH",        "portallocationpath"),
    (PortalLocationPathTitle,  "PORTAL_LOCATION_PATH_TITLE",  "portallocationpathtitle"),
    (Categories,               "CATEGORIES",                  "categories"),
    (CategoriesTitle,          "CATEGORIES_TITLE",            "categoriestitle"),
    (CategoriesPath,           "CATEGORIES_PATH",             "categoriespath"),
    (CategoriesPathTitle,      "CATEGORIES_PATH_TITLE",       "categoriespathtitle"),
    (Answer,                   "ANSWER",                      "answer"),
    (Topics,                   "TOPICS",                      "topics"),
    (TopicsTitle,              "TOPICS_TITLE",                "topicstitle"),
    (TopicsPath,               "TOPICS_PATH",                 "topicspath"),
    (TopicsTitlePath,          "TOPICS_TITLE_PATH",           "topicstitlepath"),
    (StartDate,                "START_DATE",                  "startDateAndTime"),
    (EndDate,                  "END_DATE",                    "endDateAndTime"),
    (QuestionType,             "QUESTION_TYPE",               "questionType"),
    (Location,                 "LOCATION",                    "location"),
    (NameSort,                 "NAME_SORT",                   "namesorting"),
    (TitleSort,                "TITLE_SORT",                  "titlesorting"),
}

impl Field {
    /// Resolves a wire name first, then a constant name.
    pub fn lookup(name: &str) -> Option<Self> {
        FIELDS_BY_NAME
            .get(name)
            .or_else(|| FIELDS_BY_CONSTANT.get(name))
            .copied()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Field {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UnknownField(s.to_string()))
    }
}
