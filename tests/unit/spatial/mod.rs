mod stitch;
