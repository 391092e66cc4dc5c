// Projection of response trees into fixed-shape property records
use crate::xml_tree::XmlElement;
use serde::Serialize;
use std::fmt;

/// Logical field names exposed by the result records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // Shared by both endpoints
    ZillowId,
    HomeType,
    HomeDetailLink,
    GraphDataLink,
    MapThisHomeLink,
    Latitude,
    Longitude,
    TaxYear,
    TaxValue,
    YearBuilt,
    PropertySize,
    HomeSize,
    Bathrooms,
    Bedrooms,
    LastSoldDate,
    LastSoldPrice,

    // Deep search only
    ZestimateAmount,
    ZestimateLastUpdated,
    ZestimateValueChange,
    ZestimateValuationRangeHigh,
    ZestimateValuationRangeLow,
    ZestimatePercentile,
    RentzestimateAmount,
    RentzestimateLastUpdated,
    RentzestimateValueChange,
    RentzestimateValuationRangeHigh,
    RentzestimateValuationRangeLow,
    Region,

    // Updated property details only
    PhotoGallery,
    HomeInfo,
    YearUpdated,
    FloorMaterial,
    NumFloors,
    Basement,
    Roof,
    View,
    ParkingType,
    HeatingSources,
    HeatingSystem,
    Rooms,
    NumRooms,
    Appliances,
    Neighborhood,
    SchoolDistrict,
    ElementarySchool,
    MiddleSchool,
    HomeDescription,
    PostingStatus,
    PostingType,
    AgentName,
    AgentProfileUrl,
    Brokerage,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::ZillowId => "zillow_id",
            Field::HomeType => "home_type",
            Field::HomeDetailLink => "home_detail_link",
            Field::GraphDataLink => "graph_data_link",
            Field::MapThisHomeLink => "map_this_home_link",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::TaxYear => "tax_year",
            Field::TaxValue => "tax_value",
            Field::YearBuilt => "year_built",
            Field::PropertySize => "property_size",
            Field::HomeSize => "home_size",
            Field::Bathrooms => "bathrooms",
            Field::Bedrooms => "bedrooms",
            Field::LastSoldDate => "last_sold_date",
            Field::LastSoldPrice => "last_sold_price",
            Field::ZestimateAmount => "zestimate_amount",
            Field::ZestimateLastUpdated => "zestimate_last_updated",
            Field::ZestimateValueChange => "zestimate_value_change",
            Field::ZestimateValuationRangeHigh => "zestimate_valuation_range_high",
            Field::ZestimateValuationRangeLow => "zestimate_valuation_range_low",
            Field::ZestimatePercentile => "zestimate_percentile",
            Field::RentzestimateAmount => "rentzestimate_amount",
            Field::RentzestimateLastUpdated => "rentzestimate_last_updated",
            Field::RentzestimateValueChange => "rentzestimate_value_change",
            Field::RentzestimateValuationRangeHigh => "rentzestimate_valuation_range_high",
            Field::RentzestimateValuationRangeLow => "rentzestimate_valuation_range_low",
            Field::Region => "region",
            Field::PhotoGallery => "photo_gallery",
            Field::HomeInfo => "home_info",
            Field::YearUpdated => "year_updated",
            Field::FloorMaterial => "floor_material",
            Field::NumFloors => "num_floors",
            Field::Basement => "basement",
            Field::Roof => "roof",
            Field::View => "view",
            Field::ParkingType => "parking_type",
            Field::HeatingSources => "heating_sources",
            Field::HeatingSystem => "heating_system",
            Field::Rooms => "rooms",
            Field::NumRooms => "num_rooms",
            Field::Appliances => "appliances",
            Field::Neighborhood => "neighborhood",
            Field::SchoolDistrict => "school_district",
            Field::ElementarySchool => "elementary_school",
            Field::MiddleSchool => "middle_school",
            Field::HomeDescription => "home_description",
            Field::PostingStatus => "posting_status",
            Field::PostingType => "posting_type",
            Field::AgentName => "agent_name",
            Field::AgentProfileUrl => "agent_profile_url",
            Field::Brokerage => "brokerage",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Paths relative to the first `response/results/result`
static DEEP_SEARCH_PATHS: &[(Field, &str)] = &[
    (Field::ZillowId, "zpid"),
    (Field::HomeType, "useCode"),
    (Field::HomeDetailLink, "links/homedetails"),
    (Field::GraphDataLink, "links/graphsanddata"),
    (Field::MapThisHomeLink, "links/mapthishome"),
    (Field::Latitude, "address/latitude"),
    (Field::Longitude, "address/longitude"),
    (Field::TaxYear, "taxAssessmentYear"),
    (Field::TaxValue, "taxAssessment"),
    (Field::YearBuilt, "yearBuilt"),
    (Field::PropertySize, "lotSizeSqFt"),
    (Field::HomeSize, "finishedSqFt"),
    (Field::Bathrooms, "bathrooms"),
    (Field::Bedrooms, "bedrooms"),
    (Field::LastSoldDate, "lastSoldDate"),
    (Field::LastSoldPrice, "lastSoldPrice"),
    (Field::ZestimateAmount, "zestimate/amount"),
    (Field::ZestimateLastUpdated, "zestimate/last-updated"),
    (Field::ZestimateValueChange, "zestimate/valueChange"),
    (
        Field::ZestimateValuationRangeHigh,
        "zestimate/valuationRange/high",
    ),
    (
        Field::ZestimateValuationRangeLow,
        "zestimate/valuationRange/low",
    ),
    (Field::ZestimatePercentile, "zestimate/percentile"),
    (Field::RentzestimateAmount, "rentzestimate/amount"),
    (
        Field::RentzestimateLastUpdated,
        "rentzestimate/last-updated",
    ),
    (
        Field::RentzestimateValueChange,
        "rentzestimate/valueChange",
    ),
    (
        Field::RentzestimateValuationRangeHigh,
        "rentzestimate/valuationRange/high",
    ),
    (
        Field::RentzestimateValuationRangeLow,
        "rentzestimate/valuationRange/low",
    ),
    (Field::Region, "localRealEstate/region"),
];

// Paths relative to `response`
static UPDATED_PROPERTY_DETAILS_PATHS: &[(Field, &str)] = &[
    (Field::ZillowId, "zpid"),
    (Field::HomeType, "editedFacts/useCode"),
    (Field::HomeDetailLink, "links/homeDetails"),
    (Field::Latitude, "address/latitude"),
    (Field::Longitude, "address/longitude"),
    (Field::YearBuilt, "editedFacts/yearBuilt"),
    (Field::PropertySize, "editedFacts/lotSizeSqFt"),
    (Field::HomeSize, "editedFacts/finishedSqFt"),
    (Field::Bathrooms, "editedFacts/bathrooms"),
    (Field::Bedrooms, "editedFacts/bedrooms"),
    (Field::PhotoGallery, "links/photoGallery"),
    (Field::HomeInfo, "links/homeInfo"),
    (Field::YearUpdated, "editedFacts/yearUpdated"),
    (Field::FloorMaterial, "editedFacts/floorCovering"),
    (Field::NumFloors, "editedFacts/numFloors"),
    (Field::Basement, "editedFacts/basement"),
    (Field::Roof, "editedFacts/roof"),
    (Field::View, "editedFacts/view"),
    (Field::ParkingType, "editedFacts/parkingType"),
    (Field::HeatingSources, "editedFacts/heatingSources"),
    (Field::HeatingSystem, "editedFacts/heatingSystem"),
    (Field::Rooms, "editedFacts/rooms"),
    (Field::NumRooms, "editedFacts/numRooms"),
    (Field::Appliances, "editedFacts/appliances"),
    (Field::Neighborhood, "neighborhood"),
    (Field::SchoolDistrict, "schoolDistrict"),
    (Field::ElementarySchool, "elementarySchool"),
    (Field::MiddleSchool, "middleSchool"),
    (Field::HomeDescription, "homeDescription"),
    (Field::PostingStatus, "posting/status"),
    (Field::PostingType, "posting/type"),
    (Field::AgentName, "posting/agentName"),
    (Field::AgentProfileUrl, "posting/agentProfileUrl"),
    (Field::Brokerage, "posting/brokerage"),
];

/// Where each logical field lives inside one endpoint's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    DeepSearch,
    UpdatedPropertyDetails,
}

impl FieldSource {
    /// Sub-tree of the document root the field paths are relative to.
    pub fn root_path(self) -> &'static str {
        match self {
            FieldSource::DeepSearch => "response/results/result",
            FieldSource::UpdatedPropertyDetails => "response",
        }
    }

    /// The full path table for this source.
    pub fn paths(self) -> &'static [(Field, &'static str)] {
        match self {
            FieldSource::DeepSearch => DEEP_SEARCH_PATHS,
            FieldSource::UpdatedPropertyDetails => UPDATED_PROPERTY_DETAILS_PATHS,
        }
    }

    /// Relative path of `field`, or `None` when this endpoint does not carry it.
    pub fn path(self, field: Field) -> Option<&'static str> {
        self.paths()
            .iter()
            .find(|(mapped, _)| *mapped == field)
            .map(|&(_, path)| path)
    }

    pub fn fields(self) -> impl Iterator<Item = Field> {
        self.paths().iter().map(|&(field, _)| field)
    }
}

/// A view over the selected result sub-tree of one response.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    root: &'a XmlElement,
    source: FieldSource,
}

impl<'a> Projection<'a> {
    /// Select the first sub-tree matching the source's root path.
    /// Returns `None` when the document carries no result data.
    pub fn new(document: &'a XmlElement, source: FieldSource) -> Option<Self> {
        document
            .find(source.root_path())
            .map(|root| Self { root, source })
    }

    pub fn source(&self) -> FieldSource {
        self.source
    }

    pub fn element(&self, field: Field) -> Option<&'a XmlElement> {
        self.source.path(field).and_then(|path| self.root.find(path))
    }

    pub fn get(&self, field: Field) -> Option<String> {
        self.element(field)
            .and_then(XmlElement::text)
            .map(str::to_string)
    }

    pub fn attribute(&self, field: Field, key: &str) -> Option<String> {
        self.element(field)
            .and_then(|element| element.attribute(key))
            .map(str::to_string)
    }
}

/// A fixed-shape record populated from one endpoint's response.
pub trait PropertyRecord: Sized {
    const SOURCE: FieldSource;

    fn project(projection: &Projection<'_>) -> Self;

    /// Project the first result of `document`, or `None` if it has none.
    fn from_response(document: &XmlElement) -> Option<Self> {
        Projection::new(document, Self::SOURCE).map(|p| Self::project(&p))
    }

    /// Unit of `property_size` and `home_size`.
    fn area_unit(&self) -> &'static str {
        "SqFt"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeepSearchResult {
    pub zillow_id: Option<String>,
    pub home_type: Option<String>,
    pub home_detail_link: Option<String>,
    pub graph_data_link: Option<String>,
    pub map_this_home_link: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub tax_year: Option<String>,
    pub tax_value: Option<String>,
    pub year_built: Option<String>,
    pub property_size: Option<String>,
    pub home_size: Option<String>,
    pub bathrooms: Option<String>,
    pub bedrooms: Option<String>,
    pub last_sold_date: Option<String>,
    pub last_sold_price: Option<String>,
    pub last_sold_price_currency: Option<String>,
    pub zestimate_amount: Option<String>,
    pub zestimate_currency: Option<String>,
    pub zestimate_last_updated: Option<String>,
    pub zestimate_value_change: Option<String>,
    pub zestimate_valuation_range_high: Option<String>,
    pub zestimate_valuation_range_low: Option<String>,
    pub zestimate_percentile: Option<String>,
    pub rentzestimate_amount: Option<String>,
    pub rentzestimate_last_updated: Option<String>,
    pub rentzestimate_value_change: Option<String>,
    pub rentzestimate_valuation_range_high: Option<String>,
    pub rentzestimate_valuation_range_low: Option<String>,
    pub region_name: Option<String>,
    pub region_id: Option<String>,
    pub region_type: Option<String>,
}

impl PropertyRecord for DeepSearchResult {
    const SOURCE: FieldSource = FieldSource::DeepSearch;

    fn project(p: &Projection<'_>) -> Self {
        Self {
            zillow_id: p.get(Field::ZillowId),
            home_type: p.get(Field::HomeType),
            home_detail_link: p.get(Field::HomeDetailLink),
            graph_data_link: p.get(Field::GraphDataLink),
            map_this_home_link: p.get(Field::MapThisHomeLink),
            latitude: p.get(Field::Latitude),
            longitude: p.get(Field::Longitude),
            tax_year: p.get(Field::TaxYear),
            tax_value: p.get(Field::TaxValue),
            year_built: p.get(Field::YearBuilt),
            property_size: p.get(Field::PropertySize),
            home_size: p.get(Field::HomeSize),
            bathrooms: p.get(Field::Bathrooms),
            bedrooms: p.get(Field::Bedrooms),
            last_sold_date: p.get(Field::LastSoldDate),
            last_sold_price: p.get(Field::LastSoldPrice),
            last_sold_price_currency: p.attribute(Field::LastSoldPrice, "currency"),
            zestimate_amount: p.get(Field::ZestimateAmount),
            zestimate_currency: p.attribute(Field::ZestimateAmount, "currency"),
            zestimate_last_updated: p.get(Field::ZestimateLastUpdated),
            zestimate_value_change: p.get(Field::ZestimateValueChange),
            zestimate_valuation_range_high: p.get(Field::ZestimateValuationRangeHigh),
            zestimate_valuation_range_low: p.get(Field::ZestimateValuationRangeLow),
            zestimate_percentile: p.get(Field::ZestimatePercentile),
            rentzestimate_amount: p.get(Field::RentzestimateAmount),
            rentzestimate_last_updated: p.get(Field::RentzestimateLastUpdated),
            rentzestimate_value_change: p.get(Field::RentzestimateValueChange),
            rentzestimate_valuation_range_high: p.get(Field::RentzestimateValuationRangeHigh),
            rentzestimate_valuation_range_low: p.get(Field::RentzestimateValuationRangeLow),
            region_name: p.attribute(Field::Region, "name"),
            region_id: p.attribute(Field::Region, "id"),
            region_type: p.attribute(Field::Region, "type"),
        }
    }
}

impl fmt::Display for DeepSearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.zillow_id.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UpdatedPropertyDetails {
    pub zillow_id: Option<String>,
    pub home_type: Option<String>,
    pub home_detail_link: Option<String>,
    pub graph_data_link: Option<String>,
    pub map_this_home_link: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub tax_year: Option<String>,
    pub tax_value: Option<String>,
    pub year_built: Option<String>,
    pub property_size: Option<String>,
    pub home_size: Option<String>,
    pub bathrooms: Option<String>,
    pub bedrooms: Option<String>,
    pub last_sold_date: Option<String>,
    pub last_sold_price: Option<String>,
    pub last_sold_price_currency: Option<String>,
    pub photo_gallery: Option<String>,
    pub home_info: Option<String>,
    pub year_updated: Option<String>,
    pub floor_material: Option<String>,
    pub num_floors: Option<String>,
    pub basement: Option<String>,
    pub roof: Option<String>,
    pub view: Option<String>,
    pub parking_type: Option<String>,
    pub heating_sources: Option<String>,
    pub heating_system: Option<String>,
    pub rooms: Option<String>,
    pub num_rooms: Option<String>,
    pub appliances: Option<String>,
    pub neighborhood: Option<String>,
    pub school_district: Option<String>,
    pub elementary_school: Option<String>,
    pub middle_school: Option<String>,
    pub home_description: Option<String>,
    pub posting_status: Option<String>,
    pub posting_type: Option<String>,
    pub agent_name: Option<String>,
    pub agent_profile_url: Option<String>,
    pub brokerage: Option<String>,
}

impl PropertyRecord for UpdatedPropertyDetails {
    const SOURCE: FieldSource = FieldSource::UpdatedPropertyDetails;

    fn project(p: &Projection<'_>) -> Self {
        Self {
            zillow_id: p.get(Field::ZillowId),
            home_type: p.get(Field::HomeType),
            home_detail_link: p.get(Field::HomeDetailLink),
            graph_data_link: p.get(Field::GraphDataLink),
            map_this_home_link: p.get(Field::MapThisHomeLink),
            latitude: p.get(Field::Latitude),
            longitude: p.get(Field::Longitude),
            tax_year: p.get(Field::TaxYear),
            tax_value: p.get(Field::TaxValue),
            year_built: p.get(Field::YearBuilt),
            property_size: p.get(Field::PropertySize),
            home_size: p.get(Field::HomeSize),
            bathrooms: p.get(Field::Bathrooms),
            bedrooms: p.get(Field::Bedrooms),
            last_sold_date: p.get(Field::LastSoldDate),
            last_sold_price: p.get(Field::LastSoldPrice),
            last_sold_price_currency: p.attribute(Field::LastSoldPrice, "currency"),
            photo_gallery: p.get(Field::PhotoGallery),
            home_info: p.get(Field::HomeInfo),
            year_updated: p.get(Field::YearUpdated),
            floor_material: p.get(Field::FloorMaterial),
            num_floors: p.get(Field::NumFloors),
            basement: p.get(Field::Basement),
            roof: p.get(Field::Roof),
            view: p.get(Field::View),
            parking_type: p.get(Field::ParkingType),
            heating_sources: p.get(Field::HeatingSources),
            heating_system: p.get(Field::HeatingSystem),
            rooms: p.get(Field::Rooms),
            num_rooms: p.get(Field::NumRooms),
            appliances: p.get(Field::Appliances),
            neighborhood: p.get(Field::Neighborhood),
            school_district: p.get(Field::SchoolDistrict),
            elementary_school: p.get(Field::ElementarySchool),
            middle_school: p.get(Field::MiddleSchool),
            home_description: p.get(Field::HomeDescription),
            posting_status: p.get(Field::PostingStatus),
            posting_type: p.get(Field::PostingType),
            agent_name: p.get(Field::AgentName),
            agent_profile_url: p.get(Field::AgentProfileUrl),
            brokerage: p.get(Field::Brokerage),
        }
    }
}

impl fmt::Display for UpdatedPropertyDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.zillow_id.as_deref().unwrap_or_default())
    }
}

// Sample response bodies (the files are stored in the samples directory)
#[cfg(test)]
pub(crate) mod samples {
    pub const DEEP_SEARCH_200_OK: &str = include_str!("../samples/deep_search_200_ok.xml");
    pub const UPDATED_PROPERTY_DETAILS_200_OK: &str =
        include_str!("../samples/updated_property_details_200_ok.xml");
    pub const ERROR_2_ZWSID_MISSING: &str = include_str!("../samples/error_2_zwsid_missing.xml");
    pub const ERROR_508_INVALID_ADDRESS: &str =
        include_str!("../samples/error_508_invalid_address.xml");
    pub const NO_RESULTS: &str = include_str!("../samples/no_results.xml");
}
