/// One of the pre-baked sample images the segmentation service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageOption {
    /// Name sent to the service as `image_name`.
    pub name: &'static str,
    /// Source file the service segments.
    pub file: &'static str,
    /// Preview asset, relative to a front end's preview directory.
    pub preview_asset: &'static str,
}

pub const IMAGE_OPTIONS: [ImageOption; 4] = [
    ImageOption {
        name: "Campo 1",
        file: "Campo 1.tif",
        preview_asset: "Campo 1.png",
    },
    ImageOption {
        name: "Campo 2",
        file: "Campo 2.tif",
        preview_asset: "Campo 2.png",
    },
    ImageOption {
        name: "Campo 3",
        file: "Campo 3.tif",
        preview_asset: "Campo 3.png",
    },
    ImageOption {
        name: "Campo 3R",
        file: "Campo 3R.tif",
        preview_asset: "Campo 3R.png",
    },
];

pub fn find_image(name: &str) -> Option<&'static ImageOption> {
    IMAGE_OPTIONS.iter().find(|option| option.name == name)
}
