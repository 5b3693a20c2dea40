//! Hand-curated ICAT 5 schema
//!
//! Mirrors the catalog's entity model. Must stay exhaustive: a type missing
//! here degrades navigation to "no related entities".

use super::models::{EntityType, rel};

const PARAMETER_FIELDS: &[&str] = &[
    "dateTimeValue",
    "error",
    "numericValue",
    "rangeBottom",
    "rangeTop",
    "stringValue",
];

pub(super) const ENTITY_TYPES: &[EntityType] = &[
    EntityType {
        name: "Affiliation",
        fields: &["name", "fullReference", "pid"],
        to_one: &[rel("user", "DataPublicationUser")],
        to_many: &[],
    },
    EntityType {
        name: "Application",
        fields: &["name", "version"],
        to_one: &[rel("facility", "Facility")],
        to_many: &[rel("jobs", "Job")],
    },
    EntityType {
        name: "DataCollection",
        fields: &["doi"],
        to_one: &[],
        to_many: &[
            rel("dataCollectionDatafiles", "DataCollectionDatafile"),
            rel("dataCollectionDatasets", "DataCollectionDataset"),
            rel("dataCollectionInvestigations", "DataCollectionInvestigation"),
            rel("dataPublications", "DataPublication"),
            rel("jobsAsInput", "Job"),
            rel("jobsAsOutput", "Job"),
            rel("parameters", "DataCollectionParameter"),
        ],
    },
    EntityType {
        name: "DataCollectionDatafile",
        fields: &[],
        to_one: &[
            rel("dataCollection", "DataCollection"),
            rel("datafile", "Datafile"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "DataCollectionDataset",
        fields: &[],
        to_one: &[
            rel("dataCollection", "DataCollection"),
            rel("dataset", "Dataset"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "DataCollectionInvestigation",
        fields: &[],
        to_one: &[
            rel("dataCollection", "DataCollection"),
            rel("investigation", "Investigation"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "DataCollectionParameter",
        fields: PARAMETER_FIELDS,
        to_one: &[
            rel("dataCollection", "DataCollection"),
            rel("type", "ParameterType"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "DataPublication",
        fields: &["pid", "title", "description", "publicationDate", "subject"],
        to_one: &[
            rel("facility", "Facility"),
            rel("content", "DataCollection"),
            rel("type", "DataPublicationType"),
        ],
        to_many: &[
            rel("dates", "DataPublicationDate"),
            rel("fundingReferences", "DataPublicationFunding"),
            rel("relatedItems", "RelatedItem"),
            rel("users", "DataPublicationUser"),
        ],
    },
    EntityType {
        name: "DataPublicationDate",
        fields: &["date", "dateType"],
        to_one: &[rel("publication", "DataPublication")],
        to_many: &[],
    },
    EntityType {
        name: "DataPublicationFunding",
        fields: &[],
        to_one: &[
            rel("dataPublication", "DataPublication"),
            rel("funding", "FundingReference"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "DataPublicationType",
        fields: &["name", "description"],
        to_one: &[rel("facility", "Facility")],
        to_many: &[rel("dataPublications", "DataPublication")],
    },
    EntityType {
        name: "DataPublicationUser",
        fields: &[
            "contributorType",
            "orderKey",
            "givenName",
            "familyName",
            "fullName",
            "email",
        ],
        to_one: &[
            rel("publication", "DataPublication"),
            rel("user", "User"),
        ],
        to_many: &[rel("affiliations", "Affiliation")],
    },
    EntityType {
        name: "Datafile",
        fields: &[
            "name",
            "description",
            "location",
            "fileSize",
            "checksum",
            "datafileCreateTime",
            "datafileModTime",
            "doi",
        ],
        to_one: &[
            rel("dataset", "Dataset"),
            rel("datafileFormat", "DatafileFormat"),
        ],
        to_many: &[
            rel("dataCollectionDatafiles", "DataCollectionDatafile"),
            rel("destDatafiles", "RelatedDatafile"),
            rel("parameters", "DatafileParameter"),
            rel("sourceDatafiles", "RelatedDatafile"),
        ],
    },
    EntityType {
        name: "DatafileFormat",
        fields: &["name", "version", "description", "type"],
        to_one: &[rel("facility", "Facility")],
        to_many: &[rel("datafiles", "Datafile")],
    },
    EntityType {
        name: "DatafileParameter",
        fields: PARAMETER_FIELDS,
        to_one: &[rel("datafile", "Datafile"), rel("type", "ParameterType")],
        to_many: &[],
    },
    EntityType {
        name: "Dataset",
        fields: &[
            "name",
            "description",
            "location",
            "startDate",
            "endDate",
            "complete",
            "doi",
            "fileCount",
            "fileSize",
        ],
        to_one: &[
            rel("investigation", "Investigation"),
            rel("type", "DatasetType"),
            rel("sample", "Sample"),
        ],
        to_many: &[
            rel("dataCollectionDatasets", "DataCollectionDataset"),
            rel("datafiles", "Datafile"),
            rel("datasetInstruments", "DatasetInstrument"),
            rel("datasetTechniques", "DatasetTechnique"),
            rel("parameters", "DatasetParameter"),
        ],
    },
    EntityType {
        name: "DatasetInstrument",
        fields: &[],
        to_one: &[rel("dataset", "Dataset"), rel("instrument", "Instrument")],
        to_many: &[],
    },
    EntityType {
        name: "DatasetParameter",
        fields: PARAMETER_FIELDS,
        to_one: &[rel("dataset", "Dataset"), rel("type", "ParameterType")],
        to_many: &[],
    },
    EntityType {
        name: "DatasetTechnique",
        fields: &[],
        to_one: &[rel("dataset", "Dataset"), rel("technique", "Technique")],
        to_many: &[],
    },
    EntityType {
        name: "DatasetType",
        fields: &["name", "description"],
        to_one: &[rel("facility", "Facility")],
        to_many: &[rel("datasets", "Dataset")],
    },
    EntityType {
        name: "Facility",
        fields: &["name", "fullName", "description", "daysUntilRelease", "url"],
        to_one: &[],
        to_many: &[
            rel("applications", "Application"),
            rel("dataPublications", "DataPublication"),
            rel("dataPublicationTypes", "DataPublicationType"),
            rel("datafileFormats", "DatafileFormat"),
            rel("datasetTypes", "DatasetType"),
            rel("facilityCycles", "FacilityCycle"),
            rel("instruments", "Instrument"),
            rel("investigationTypes", "InvestigationType"),
            rel("investigations", "Investigation"),
            rel("parameterTypes", "ParameterType"),
            rel("sampleTypes", "SampleType"),
        ],
    },
    EntityType {
        name: "FacilityCycle",
        fields: &["name", "description", "startDate", "endDate"],
        to_one: &[rel("facility", "Facility")],
        to_many: &[rel(
            "investigationFacilityCycles",
            "InvestigationFacilityCycle",
        )],
    },
    EntityType {
        name: "FundingReference",
        fields: &["funderName", "funderIdentifier", "awardNumber", "awardTitle"],
        to_one: &[],
        to_many: &[
            rel("investigations", "InvestigationFunding"),
            rel("publications", "DataPublicationFunding"),
        ],
    },
    EntityType {
        name: "Grouping",
        fields: &["name"],
        to_one: &[],
        to_many: &[
            rel("investigationGroups", "InvestigationGroup"),
            rel("rules", "Rule"),
            rel("userGroups", "UserGroup"),
        ],
    },
    EntityType {
        name: "Instrument",
        fields: &["name", "fullName", "description", "type", "url", "pid"],
        to_one: &[rel("facility", "Facility")],
        to_many: &[
            rel("datasetInstruments", "DatasetInstrument"),
            rel("instrumentScientists", "InstrumentScientist"),
            rel("investigationInstruments", "InvestigationInstrument"),
            rel("shifts", "Shift"),
        ],
    },
    EntityType {
        name: "InstrumentScientist",
        fields: &[],
        to_one: &[rel("instrument", "Instrument"), rel("user", "User")],
        to_many: &[],
    },
    EntityType {
        name: "Investigation",
        fields: &[
            "name",
            "title",
            "summary",
            "visitId",
            "startDate",
            "endDate",
            "releaseDate",
            "doi",
            "fileCount",
            "fileSize",
        ],
        to_one: &[
            rel("facility", "Facility"),
            rel("type", "InvestigationType"),
        ],
        to_many: &[
            rel("dataCollectionInvestigations", "DataCollectionInvestigation"),
            rel("datasets", "Dataset"),
            rel("fundingReferences", "InvestigationFunding"),
            rel("investigationFacilityCycles", "InvestigationFacilityCycle"),
            rel("investigationGroups", "InvestigationGroup"),
            rel("investigationInstruments", "InvestigationInstrument"),
            rel("investigationUsers", "InvestigationUser"),
            rel("keywords", "Keyword"),
            rel("parameters", "InvestigationParameter"),
            rel("publications", "Publication"),
            rel("samples", "Sample"),
            rel("shifts", "Shift"),
            rel("studyInvestigations", "StudyInvestigation"),
        ],
    },
    EntityType {
        name: "InvestigationFacilityCycle",
        fields: &[],
        to_one: &[
            rel("facilityCycle", "FacilityCycle"),
            rel("investigation", "Investigation"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "InvestigationFunding",
        fields: &[],
        to_one: &[
            rel("funding", "FundingReference"),
            rel("investigation", "Investigation"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "InvestigationGroup",
        fields: &["role"],
        to_one: &[
            rel("grouping", "Grouping"),
            rel("investigation", "Investigation"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "InvestigationInstrument",
        fields: &[],
        to_one: &[
            rel("instrument", "Instrument"),
            rel("investigation", "Investigation"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "InvestigationParameter",
        fields: PARAMETER_FIELDS,
        to_one: &[
            rel("investigation", "Investigation"),
            rel("type", "ParameterType"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "InvestigationType",
        fields: &["name", "description"],
        to_one: &[rel("facility", "Facility")],
        to_many: &[rel("investigations", "Investigation")],
    },
    EntityType {
        name: "InvestigationUser",
        fields: &["role"],
        to_one: &[
            rel("investigation", "Investigation"),
            rel("user", "User"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "Job",
        fields: &["arguments"],
        to_one: &[
            rel("application", "Application"),
            rel("inputDataCollection", "DataCollection"),
            rel("outputDataCollection", "DataCollection"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "Keyword",
        fields: &["name"],
        to_one: &[rel("investigation", "Investigation")],
        to_many: &[],
    },
    EntityType {
        name: "ParameterType",
        fields: &[
            "name",
            "units",
            "unitsFullName",
            "description",
            "valueType",
            "applicableToDataCollection",
            "applicableToDatafile",
            "applicableToDataset",
            "applicableToInvestigation",
            "applicableToSample",
            "enforced",
            "verified",
            "minimumNumericValue",
            "maximumNumericValue",
            "pid",
        ],
        to_one: &[rel("facility", "Facility")],
        to_many: &[
            rel("dataCollectionParameters", "DataCollectionParameter"),
            rel("datafileParameters", "DatafileParameter"),
            rel("datasetParameters", "DatasetParameter"),
            rel("investigationParameters", "InvestigationParameter"),
            rel("permissibleStringValues", "PermissibleStringValue"),
            rel("sampleParameters", "SampleParameter"),
        ],
    },
    EntityType {
        name: "PermissibleStringValue",
        fields: &["value"],
        to_one: &[rel("type", "ParameterType")],
        to_many: &[],
    },
    EntityType {
        name: "PublicStep",
        fields: &["origin", "field"],
        to_one: &[],
        to_many: &[],
    },
    EntityType {
        name: "Publication",
        fields: &["fullReference", "doi", "repository", "repositoryId", "url"],
        to_one: &[rel("investigation", "Investigation")],
        to_many: &[],
    },
    EntityType {
        name: "RelatedDatafile",
        fields: &["relation"],
        to_one: &[
            rel("sourceDatafile", "Datafile"),
            rel("destDatafile", "Datafile"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "RelatedItem",
        fields: &[
            "identifier",
            "relationType",
            "fullReference",
            "relatedItemType",
            "title",
        ],
        to_one: &[rel("publication", "DataPublication")],
        to_many: &[],
    },
    EntityType {
        name: "Rule",
        fields: &["crudFlags", "what"],
        to_one: &[rel("grouping", "Grouping")],
        to_many: &[],
    },
    EntityType {
        name: "Sample",
        fields: &["name", "pid"],
        to_one: &[
            rel("investigation", "Investigation"),
            rel("type", "SampleType"),
        ],
        to_many: &[
            rel("datasets", "Dataset"),
            rel("parameters", "SampleParameter"),
        ],
    },
    EntityType {
        name: "SampleParameter",
        fields: PARAMETER_FIELDS,
        to_one: &[rel("sample", "Sample"), rel("type", "ParameterType")],
        to_many: &[],
    },
    EntityType {
        name: "SampleType",
        fields: &["name", "molecularFormula", "safetyInformation", "pid"],
        to_one: &[rel("facility", "Facility")],
        to_many: &[rel("samples", "Sample")],
    },
    EntityType {
        name: "Shift",
        fields: &["comment", "startDate", "endDate"],
        to_one: &[
            rel("instrument", "Instrument"),
            rel("investigation", "Investigation"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "Study",
        fields: &["name", "description", "startDate", "endDate", "status", "pid"],
        to_one: &[rel("user", "User")],
        to_many: &[rel("studyInvestigations", "StudyInvestigation")],
    },
    EntityType {
        name: "StudyInvestigation",
        fields: &[],
        to_one: &[
            rel("investigation", "Investigation"),
            rel("study", "Study"),
        ],
        to_many: &[],
    },
    EntityType {
        name: "Technique",
        fields: &["name", "description", "pid"],
        to_one: &[],
        to_many: &[rel("datasetTechniques", "DatasetTechnique")],
    },
    EntityType {
        name: "User",
        fields: &[
            "name",
            "fullName",
            "givenName",
            "familyName",
            "email",
            "orcidId",
            "affiliation",
        ],
        to_one: &[],
        to_many: &[
            rel("dataPublicationUsers", "DataPublicationUser"),
            rel("instrumentScientists", "InstrumentScientist"),
            rel("investigationUsers", "InvestigationUser"),
            rel("studies", "Study"),
            rel("userGroups", "UserGroup"),
        ],
    },
    EntityType {
        name: "UserGroup",
        fields: &[],
        to_one: &[rel("grouping", "Grouping"), rel("user", "User")],
        to_many: &[],
    },
];
